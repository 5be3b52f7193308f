// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`Launcher`], which hands a [`BootEntry`] to the firmware to be loaded and started.
//!
//! The watchdog is armed right before the image is loaded, and disarmed once control comes back, whether the
//! load failed, the start failed, or the image ran and returned.

use log::{info, warn};
use thiserror::Error;
use uefi::Status;

use crate::{
    boot::entry::BootEntry,
    load_option::{DecodeError, device_path},
    system::{
        image::ImageService,
        watchdog::{Watchdog, WatchdogGuard},
    },
};

/// An `Error` that may result from launching a boot entry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchError {
    /// The entry has an empty file path list.
    #[error("Boot{0:04X} has no file path to launch")]
    NoFilePath(u16),

    /// The file path list of the entry is not a valid chain of device path nodes.
    #[error("Boot{0:04X} has a malformed file path: {1}")]
    MalformedPath(u16, DecodeError),

    /// The firmware could not load the image.
    #[error("Failed to load image: {0}")]
    ImageLoadFailure(Status),

    /// The image could not be started, or exited with an error.
    #[error("Failed to start image: {0}")]
    ImageStartFailure(Status),
}

/// Launches boot entries through an [`ImageService`] with a [`Watchdog`] armed.
pub struct Launcher<S: ImageService + Watchdog> {
    /// The firmware services.
    services: S,

    /// The watchdog timeout in seconds. Zero launches without a watchdog.
    watchdog_timeout: usize,
}

impl<S: ImageService + Watchdog> Launcher<S> {
    /// Creates a new [`Launcher`].
    pub const fn new(services: S, watchdog_timeout: usize) -> Self {
        Self {
            services,
            watchdog_timeout,
        }
    }

    /// Returns the firmware services used by the launcher.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn services(&self) -> &S {
        &self.services
    }

    /// Loads and starts a boot entry.
    ///
    /// Returns `Ok(())` if the image ran and gave control back.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the entry has nothing to launch, or the image failed to load or start.
    pub fn launch(&mut self, entry: &BootEntry) -> Result<(), LaunchError> {
        let file_path = entry.file_path_list();
        if file_path.is_empty() {
            return Err(LaunchError::NoFilePath(entry.id()));
        }
        device_path::validate(file_path).map_err(|e| LaunchError::MalformedPath(entry.id(), e))?;

        info!("Launching {} ({})", entry.name(), entry.label());

        let _guard = WatchdogGuard::arm(&self.services, self.watchdog_timeout);

        let image = self
            .services
            .load_image(file_path)
            .map_err(|e| LaunchError::ImageLoadFailure(e.status()))?;

        if let Err(e) = self.services.start_image(image) {
            if let Err(unload) = self.services.unload_image(image) {
                warn!("Failed to unload image after start failure: {unload}");
            }
            return Err(LaunchError::ImageStartFailure(e.status()));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use uefi::CStr16;

    use crate::load_option::{
        device_path::tests::FILE_PATH_A,
        tests::{build_record, units},
    };

    use super::*;

    /// A firmware call observed by [`MockFirmware`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) enum Call {
        /// The watchdog was armed with a timeout.
        Arm(usize),
        /// The watchdog was disarmed.
        Disarm,
        /// An image was loaded.
        Load,
        /// An image was started.
        Start,
        /// An image was unloaded.
        Unload,
    }

    /// Image and watchdog services that record every call.
    #[derive(Default)]
    pub(crate) struct MockFirmware {
        /// The calls, in order.
        pub(crate) calls: RefCell<Vec<Call>>,

        /// Status returned by `load_image`, if it should fail.
        pub(crate) load_status: Option<Status>,

        /// Status returned by `start_image`, if it should fail.
        pub(crate) start_status: Option<Status>,
    }

    impl MockFirmware {
        /// Returns the calls made so far.
        pub(crate) fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl ImageService for MockFirmware {
        type Image = u32;

        fn load_image(&self, file_path: &[u8]) -> uefi::Result<u32> {
            assert!(!file_path.is_empty());
            self.calls.borrow_mut().push(Call::Load);
            match self.load_status {
                Some(status) => Err(status.into()),
                None => Ok(7),
            }
        }

        fn start_image(&self, image: u32) -> uefi::Result {
            assert_eq!(image, 7);
            self.calls.borrow_mut().push(Call::Start);
            match self.start_status {
                Some(status) => Err(status.into()),
                None => Ok(()),
            }
        }

        fn unload_image(&self, _image: u32) -> uefi::Result {
            self.calls.borrow_mut().push(Call::Unload);
            Ok(())
        }
    }

    impl Watchdog for MockFirmware {
        fn set_watchdog(&self, timeout: usize, _code: u64, _label: &CStr16) -> uefi::Result {
            let call = if timeout == 0 {
                Call::Disarm
            } else {
                Call::Arm(timeout)
            };
            self.calls.borrow_mut().push(call);
            Ok(())
        }
    }

    /// Creates a launchable entry.
    fn entry() -> BootEntry {
        let record = build_record(1, &units("Linux"), &FILE_PATH_A, &[]);
        BootEntry::new(1, record.into_boxed_slice(), 0)
            .expect("Failed to create entry from valid record in test")
    }

    #[test]
    fn test_start_returns() {
        let mut launcher = Launcher::new(MockFirmware::default(), 300);
        assert_eq!(launcher.launch(&entry()), Ok(()));
        assert_eq!(
            launcher.services().calls(),
            [Call::Arm(300), Call::Load, Call::Start, Call::Disarm]
        );
    }

    #[test]
    fn test_load_failure_disarms() {
        let firmware = MockFirmware {
            load_status: Some(Status::NOT_FOUND),
            ..Default::default()
        };
        let mut launcher = Launcher::new(firmware, 300);
        assert_eq!(
            launcher.launch(&entry()),
            Err(LaunchError::ImageLoadFailure(Status::NOT_FOUND))
        );
        assert_eq!(
            launcher.services().calls(),
            [Call::Arm(300), Call::Load, Call::Disarm]
        );
    }

    #[test]
    fn test_start_failure_unloads_and_disarms() {
        let firmware = MockFirmware {
            start_status: Some(Status::SECURITY_VIOLATION),
            ..Default::default()
        };
        let mut launcher = Launcher::new(firmware, 300);
        assert_eq!(
            launcher.launch(&entry()),
            Err(LaunchError::ImageStartFailure(Status::SECURITY_VIOLATION))
        );
        assert_eq!(
            launcher.services().calls(),
            [Call::Arm(300), Call::Load, Call::Start, Call::Unload, Call::Disarm]
        );
    }

    #[test]
    fn test_no_file_path_arms_nothing() {
        let record = build_record(1, &units("Setup"), &[], &[]);
        let entry = BootEntry::new(4, record.into_boxed_slice(), 0)
            .expect("Failed to create entry from valid record in test");
        let mut launcher = Launcher::new(MockFirmware::default(), 300);
        assert_eq!(launcher.launch(&entry), Err(LaunchError::NoFilePath(4)));
        assert!(launcher.services().calls().is_empty());
    }

    #[test]
    fn test_malformed_path_arms_nothing() {
        let record = build_record(1, &units("Broken"), &FILE_PATH_A[..10], &[]);
        let entry = BootEntry::new(2, record.into_boxed_slice(), 0)
            .expect("Failed to create entry from valid record in test");
        let mut launcher = Launcher::new(MockFirmware::default(), 300);
        assert_eq!(
            launcher.launch(&entry),
            Err(LaunchError::MalformedPath(2, DecodeError::LengthMismatch(10)))
        );
        assert!(launcher.services().calls().is_empty());
    }

    #[test]
    fn test_zero_timeout_skips_watchdog() {
        let mut launcher = Launcher::new(MockFirmware::default(), 0);
        assert_eq!(launcher.launch(&entry()), Ok(()));
        assert_eq!(launcher.services().calls(), [Call::Load, Call::Start]);
    }
}
