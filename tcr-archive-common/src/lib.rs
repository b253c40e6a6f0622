// Copyright 2019-2021 The tcr-archive Authors.
// This file is part of tcr-archive.

// tcr-archive is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// tcr-archive is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with tcr-archive.  If not, see <http://www.gnu.org/licenses/>.

//! Types shared between the gateway, the engine and the binaries:
//! the raw crawler event model and the utilities to work with it.

pub mod error;
pub mod types;
pub mod util;

pub use error::{Error, Result};
pub use types::{AbiValue, Address, ContractKind, Event, LogMeta, Payload, RetrievalMethod, H256, U256};
