// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod cat;
pub mod ls;
pub mod mkdir;
pub mod patch;
pub mod put;
pub mod rm;
pub mod stat;
pub mod url;

pub use cat::cat_command;
pub use ls::ls_command;
pub use mkdir::{mkdir_command, rmdir_command};
pub use patch::patch_command;
pub use put::{PutSource, put_command};
pub use rm::rm_command;
pub use stat::stat_command;
pub use url::url_command;
