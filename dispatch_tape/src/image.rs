// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher image construction and inspection.
//!
//! [`DispatcherImage::build`] assembles init code into a private, exactly-sized buffer.
//! [`DispatcherCode::parse`] goes the other way: it checks that deployed code is a dispatcher and
//! exposes its target and config.
//!
//! See [`crate::layout`] for the byte layout.

use alloc::vec::Vec;

use crate::format::{DecodeError, Reader};
use crate::layout::{
    self, CONFIG_CODE_OFFSET, CONSTRUCTOR_LEN, EXTRA_LENGTH_AT, LayoutError, PREFIX_LEN,
    RUN_SIZE_AT, RUNTIME_LEN, TARGET_AT, TEMPLATE, TRAILER_LEN,
};
use crate::word::Address;

/// Writes the constructor and runtime body for a config of `config_len` bytes into `out`.
///
/// Both construction paths (private buffer and scratch window) go through here so the holes are
/// filled identically.
pub fn write_prefix(
    out: &mut [u8; PREFIX_LEN],
    target: Address,
    config_len: usize,
) -> Result<(), LayoutError> {
    let extra = layout::extra_length(config_len)?;
    let run = layout::run_size(config_len)?;
    *out = TEMPLATE;
    out[RUN_SIZE_AT..RUN_SIZE_AT + 2].copy_from_slice(&run.to_be_bytes());
    out[EXTRA_LENGTH_AT..EXTRA_LENGTH_AT + 2].copy_from_slice(&extra.to_be_bytes());
    out[TARGET_AT..TARGET_AT + Address::LEN].copy_from_slice(target.as_bytes());
    Ok(())
}

/// Init code for one dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatcherImage {
    bytes: Vec<u8>,
    target: Address,
    extra_length: u16,
}

impl DispatcherImage {
    /// Builds the init code forwarding to `target` with `config` baked in.
    ///
    /// Fails with [`LayoutError::ConfigTooLarge`] before allocating if `config` is longer than
    /// [`layout::MAX_CONFIG_LEN`].
    pub fn build(target: Address, config: &[u8]) -> Result<Self, LayoutError> {
        let extra = layout::extra_length(config.len())?;
        let mut prefix = [0_u8; PREFIX_LEN];
        write_prefix(&mut prefix, target, config.len())?;

        let mut bytes = Vec::with_capacity(PREFIX_LEN + usize::from(extra));
        bytes.extend_from_slice(&prefix);
        bytes.extend_from_slice(config);
        bytes.extend_from_slice(&extra.to_be_bytes());
        Ok(Self {
            bytes,
            target,
            extra_length: extra,
        })
    }

    /// Returns the full init code (constructor included).
    #[must_use]
    pub fn init_code(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the code the constructor leaves behind.
    #[must_use]
    pub fn runtime_code(&self) -> &[u8] {
        &self.bytes[CONSTRUCTOR_LEN..]
    }

    /// Returns the baked config bytes.
    #[must_use]
    pub fn config(&self) -> &[u8] {
        &self.bytes[PREFIX_LEN..self.bytes.len() - TRAILER_LEN]
    }

    /// Returns the forwarding target.
    #[must_use]
    pub fn target(&self) -> Address {
        self.target
    }

    /// Returns `extraLength` (config length plus the 2-byte trailer).
    #[must_use]
    pub fn extra_length(&self) -> u16 {
        self.extra_length
    }

    /// Consumes the image and returns the init code.
    #[must_use]
    pub fn into_init_code(self) -> Vec<u8> {
        self.bytes
    }
}

/// A validated view of deployed dispatcher code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DispatcherCode<'a> {
    target: Address,
    config: &'a [u8],
    extra_length: u16,
}

impl<'a> DispatcherCode<'a> {
    /// Parses deployed (runtime) code.
    ///
    /// Checks every fixed byte of the runtime body, that the embedded `extraLength` matches the
    /// trailer, and that the trailer matches the code size.
    pub fn parse(code: &'a [u8]) -> Result<Self, DecodeError> {
        let template = &TEMPLATE[CONSTRUCTOR_LEN..];
        let mut r = Reader::new(code);
        let body = r.read_bytes(RUNTIME_LEN)?;
        for (i, (&have, &want)) in body.iter().zip(template).enumerate() {
            let at = CONSTRUCTOR_LEN + i;
            if !layout::is_template_hole(at) && have != want {
                return Err(DecodeError::TemplateMismatch { at: i });
            }
        }

        let embedded = {
            let at = EXTRA_LENGTH_AT - CONSTRUCTOR_LEN;
            u16::from_be_bytes([body[at], body[at + 1]])
        };
        let mut target = [0_u8; Address::LEN];
        let at = TARGET_AT - CONSTRUCTOR_LEN;
        target.copy_from_slice(&body[at..at + Address::LEN]);

        let tail = code.len() - RUNTIME_LEN;
        if tail < TRAILER_LEN {
            return Err(DecodeError::UnexpectedEof);
        }
        let config = r.read_bytes(tail - TRAILER_LEN)?;
        let trailer = r.read_u16_be()?;

        let implied = u16::try_from(tail).map_err(|_| DecodeError::OutOfBounds)?;
        if trailer != implied {
            return Err(DecodeError::LengthMismatch {
                expected: implied,
                found: trailer,
            });
        }
        if embedded != trailer {
            return Err(DecodeError::LengthMismatch {
                expected: trailer,
                found: embedded,
            });
        }

        Ok(Self {
            target: Address(target),
            config,
            extra_length: trailer,
        })
    }

    /// Returns the forwarding target.
    #[must_use]
    pub fn target(&self) -> Address {
        self.target
    }

    /// Returns the baked config bytes.
    #[must_use]
    pub fn config(&self) -> &'a [u8] {
        self.config
    }

    /// Returns `extraLength`.
    #[must_use]
    pub fn extra_length(&self) -> u16 {
        self.extra_length
    }

    /// Returns the code offset the runtime copies the config from.
    #[must_use]
    pub fn config_code_offset(&self) -> usize {
        CONFIG_CODE_OFFSET
    }
}
