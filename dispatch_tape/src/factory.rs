// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Creating dispatchers.
//!
//! Every entry point builds the same init code (see [`crate::image`]) and hands it to a
//! [`Deployer`]. A zero identifier from the deployer becomes [`CreateError::CreateFailed`]; it is
//! reported, never retried.

use core::fmt;
use core::ops::Range;

use crate::host::{AddressPredictor, Deployer};
use crate::image::DispatcherImage;
use crate::layout::LayoutError;
use crate::scratch::with_scratch_image;
use crate::word::{Address, Word};

/// Dispatcher creation failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateError {
    /// The image could not be laid out. Nothing was instantiated.
    Layout(LayoutError),
    /// The deployer returned the zero identifier.
    CreateFailed,
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(e) => write!(f, "layout error: {e}"),
            Self::CreateFailed => write!(f, "instantiation returned the zero identifier"),
        }
    }
}

impl core::error::Error for CreateError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Layout(e) => Some(e),
            Self::CreateFailed => None,
        }
    }
}

impl From<LayoutError> for CreateError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

fn checked(addr: Address) -> Result<Address, CreateError> {
    if addr.is_zero() {
        Err(CreateError::CreateFailed)
    } else {
        Ok(addr)
    }
}

/// Creates a dispatcher forwarding to `target` with `config` baked in.
pub fn create<D: Deployer + ?Sized>(
    deployer: &mut D,
    target: Address,
    config: &[u8],
) -> Result<Address, CreateError> {
    let image = DispatcherImage::build(target, config)?;
    checked(deployer.instantiate(image.init_code()))
}

/// Creates a dispatcher at the identifier determined by its image and `salt`.
///
/// Fails with [`CreateError::CreateFailed`] if that identifier is already in use.
pub fn create_salted<D: Deployer + ?Sized>(
    deployer: &mut D,
    target: Address,
    config: &[u8],
    salt: Word,
) -> Result<Address, CreateError> {
    let image = DispatcherImage::build(target, config)?;
    checked(deployer.instantiate_salted(image.init_code(), salt))
}

/// Returns the identifier [`create_salted`] would produce for the same arguments.
pub fn predict_salted<P: AddressPredictor + ?Sized>(
    predictor: &P,
    target: Address,
    config: &[u8],
    salt: Word,
) -> Result<Address, LayoutError> {
    let image = DispatcherImage::build(target, config)?;
    Ok(predictor.predict_salted(image.init_code(), salt))
}

/// Creates a dispatcher whose config is `buf[config]`, building the image in place.
///
/// The bytes around the config are borrowed as scratch space and restored before this returns,
/// whether or not instantiation succeeded. See [`crate::scratch`].
pub fn create_in_window<D: Deployer + ?Sized>(
    deployer: &mut D,
    buf: &mut [u8],
    config: Range<usize>,
    target: Address,
) -> Result<Address, CreateError> {
    let addr = with_scratch_image(buf, config, target, |code| deployer.instantiate(code))?;
    checked(addr)
}
