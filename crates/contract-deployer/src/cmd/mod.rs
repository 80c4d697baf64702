// Copyright (C) Use Ink (UK) Ltd.
// This file is part of contract-deployer.
//
// contract-deployer is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// contract-deployer is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with contract-deployer.  If not, see <http://www.gnu.org/licenses/>.

pub mod deploy;
pub mod verify;

pub(crate) use self::{
    deploy::DeployCommand,
    verify::VerifyCommand,
};

/// Width of the key column of key/value result lines.
pub const DEFAULT_KEY_COL_WIDTH: usize = 12;

/// Prints a key/value pair, the key right-aligned and highlighted.
macro_rules! name_value_println {
    ($name:tt, $value:expr, $width:expr) => {{
        use colored::Colorize as _;
        ::std::println!(
            "{:>width$} {}",
            $name.bright_purple().bold(),
            $value,
            width = $width,
        );
    }};
    ($name:tt, $value:expr) => {
        $crate::cmd::name_value_println!($name, $value, $crate::cmd::DEFAULT_KEY_COL_WIDTH)
    };
}

pub(crate) use name_value_println;
