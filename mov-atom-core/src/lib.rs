// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared plumbing for the mov-atom codec: the error type, byte-level I/O traits, the bounded
//! byte source used to scope every atom body, four character codes, and fixed-point values.

pub mod errors;
pub mod fourcc;
pub mod fp;
pub mod io;
