// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Multipart form support for `-F`

mod field;
mod multipart;

pub use field::{parse_field, parse_form, FieldDescriptor, FormData};
pub use multipart::{build_multipart, MultipartWriter};
