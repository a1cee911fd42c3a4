// Copyright (c) 2026 MCU-Debug Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Run-length expansion for stubs that send the repeat count as two hex
//! digits.
//!
//! A run is written `<c>*<h><l>`: the character before the marker is copied
//! as usual, then repeated `0x<h><l>` more times. So `a*03` expands to
//! `aaaa`. The character repeated is the one just before the marker in the
//! encoded text.

use log::debug;

use crate::error::{CodecError, EncodingFault};

pub const RUN_MARKER: char = '*';
pub const COUNT_DIGITS: usize = 2;

/// Expand a run-length encoded reply into flat text.
///
/// Nothing is returned on failure; a reply that fails to expand must be
/// discarded whole.
pub fn decode(encoded: &str) -> Result<String, CodecError> {
    if !encoded.contains(RUN_MARKER) {
        return Ok(encoded.to_string());
    }

    // (byte offset, char), so errors point into the encoded text by byte.
    let chars: Vec<(usize, char)> = encoded.char_indices().collect();
    let mut expanded = String::with_capacity(encoded.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];
        if c != RUN_MARKER {
            expanded.push(c);
            i += 1;
            continue;
        }

        let fail = |fault| CodecError::MalformedEncoding { position, fault };
        if i == 0 {
            return Err(fail(EncodingFault::LeadingMarker));
        }
        if chars.len() - (i + 1) < COUNT_DIGITS {
            return Err(fail(EncodingFault::TruncatedCount));
        }

        let digits = [chars[i + 1].1, chars[i + 2].1];
        let count = match (digits[0].to_digit(16), digits[1].to_digit(16)) {
            (Some(hi), Some(lo)) => ((hi << 4) | lo) as usize,
            _ => return Err(fail(EncodingFault::InvalidCount(digits))),
        };
        if count == 0 {
            return Err(fail(EncodingFault::ZeroCount));
        }

        let repeated = chars[i - 1].1;
        expanded.extend(std::iter::repeat(repeated).take(count));
        i += 1 + COUNT_DIGITS;
    }

    debug!(
        "run-length expanded {} chars into {}",
        encoded.len(),
        expanded.len()
    );
    Ok(expanded)
}
