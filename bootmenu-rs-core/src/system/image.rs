// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Image loading and execution.
//!
//! This wraps around [`boot::load_image`] and [`boot::start_image`] behind the [`ImageService`] trait.

use uefi::{
    Handle, Status,
    boot::{self, LoadImageSource},
    proto::{BootPolicy, device_path::DevicePath},
};

/// A service that can load and start executable images.
pub trait ImageService {
    /// The loaded image.
    type Image: Copy;

    /// Loads an image from a device path chain.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the image could not be found, read, or verified.
    fn load_image(&self, file_path: &[u8]) -> uefi::Result<Self::Image>;

    /// Transfers control to a loaded image. On success this returns only if the image itself returns.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the image failed to start, or exited with an error.
    fn start_image(&self, image: Self::Image) -> uefi::Result;

    /// Unloads an image that will not be started.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the image could not be unloaded.
    fn unload_image(&self, image: Self::Image) -> uefi::Result;
}

/// The firmware's boot services.
#[derive(Clone, Copy, Debug, Default)]
pub struct UefiServices;

impl ImageService for UefiServices {
    type Image = Handle;

    fn load_image(&self, file_path: &[u8]) -> uefi::Result<Handle> {
        let device_path = <&DevicePath>::try_from(file_path)
            .map_err(|_| uefi::Error::from(Status::INVALID_PARAMETER))?;

        let src = LoadImageSource::FromDevicePath {
            device_path,
            boot_policy: BootPolicy::BootSelection,
        };
        boot::load_image(boot::image_handle(), src)
    }

    fn start_image(&self, image: Handle) -> uefi::Result {
        boot::start_image(image)
    }

    fn unload_image(&self, image: Handle) -> uefi::Result {
        boot::unload_image(image)
    }
}
