//! Runtime loading of `CybSDK_Native`
//!
//! Every entry point is resolved once at load time. The function pointers are
//! copied out of the `libloading` symbols and stay valid because the
//! [`Library`] is kept alive alongside them.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use libloading::Library;
use tracing::{debug, info};

use crate::error::DeviceError;
use crate::ffi::*;

/// Environment variable overriding the library location
pub const LIBRARY_PATH_ENV: &str = "CYBSDK_NATIVE_PATH";

/// Base name of the vendor library (without platform prefix/suffix)
pub const LIBRARY_NAME: &str = "CybSDK_Native";

/// Resolved native entry points
#[derive(Clone, Copy)]
pub(crate) struct SymbolTable {
    pub get_sdk_version: GetSdkVersionFn,
    pub find_device: FindDeviceFn,
    pub get_device: GetDeviceFn,
    pub find_devices: FindDevicesFn,
    pub delete_found_devices: DeleteFoundDevicesFn,
    pub create_mockup_xinput: CreateMockupFn,
    pub create_mockup_keyboard: CreateMockupFn,
    pub delete_device: DeleteDeviceFn,

    pub open: DeviceBoolFn,
    pub is_open: DeviceBoolFn,
    pub close: DeviceBoolFn,
    pub get_device_info: GetDeviceInfoFn,

    pub get_player_height: DeviceFloatFn,
    pub reset_player_height: DeviceVoidFn,
    pub get_player_orientation: DeviceFloatFn,
    pub reset_player_orientation: DeviceVoidFn,
    pub get_movement_speed: DeviceFloatFn,
    pub get_movement_direction: DeviceFloatFn,

    pub has_haptic: DeviceBoolFn,
    pub haptic_play: DeviceVoidFn,
    pub haptic_stop: DeviceVoidFn,
    pub haptic_set_gain: DeviceIntArgFn,
    pub haptic_set_frequency: DeviceIntArgFn,
    pub haptic_set_volume: DeviceIntArgFn,
}

/// Look up one symbol and copy out the function pointer
///
/// # Safety
///
/// `T` must match the real signature of the exported symbol.
unsafe fn resolve<T: Copy>(library: &Library, name: &'static str) -> Result<T, DeviceError> {
    // SAFETY: signature correctness is the caller's contract.
    let symbol = unsafe { library.get::<T>(name.as_bytes()) }
        .map_err(|source| DeviceError::MissingSymbol { name, source })?;
    Ok(*symbol)
}

impl SymbolTable {
    /// # Safety
    ///
    /// `library` must be a build of `CybSDK_Native` exporting the 4.x ABI.
    unsafe fn load(library: &Library) -> Result<Self, DeviceError> {
        // SAFETY: the type aliases in `ffi` mirror the vendor headers.
        unsafe {
            Ok(Self {
                get_sdk_version: resolve(library, "CybSDK_Virt_GetSDKVersion")?,
                find_device: resolve(library, "CybSDK_Virt_FindDevice")?,
                get_device: resolve(library, "CybSDK_Virt_GetDevice")?,
                find_devices: resolve(library, "CybSDK_Virt_FindDevices")?,
                delete_found_devices: resolve(library, "CybSDK_Virt_DeleteFoundDevices")?,
                create_mockup_xinput: resolve(library, "CybSDK_Virt_CreateDeviceMockupXInput")?,
                create_mockup_keyboard: resolve(
                    library,
                    "CybSDK_Virt_CreateDeviceMockupKeyboard",
                )?,
                delete_device: resolve(library, "CybSDK_Virt_DeleteDevice")?,

                open: resolve(library, "CybSDK_VirtDevice_Open")?,
                is_open: resolve(library, "CybSDK_VirtDevice_IsOpen")?,
                close: resolve(library, "CybSDK_VirtDevice_Close")?,
                get_device_info: resolve(library, "CybSDK_VirtDevice_GetDeviceInfo")?,

                get_player_height: resolve(library, "CybSDK_VirtDevice_GetPlayerHeight")?,
                reset_player_height: resolve(library, "CybSDK_VirtDevice_ResetPlayerHeight")?,
                get_player_orientation: resolve(
                    library,
                    "CybSDK_VirtDevice_GetPlayerOrientation",
                )?,
                reset_player_orientation: resolve(
                    library,
                    "CybSDK_VirtDevice_ResetPlayerOrientation_V40",
                )?,
                get_movement_speed: resolve(library, "CybSDK_VirtDevice_GetMovementSpeed")?,
                get_movement_direction: resolve(
                    library,
                    "CybSDK_VirtDevice_GetMovementDirection",
                )?,

                has_haptic: resolve(library, "CybSDK_VirtDevice_HasHaptic")?,
                haptic_play: resolve(library, "CybSDK_VirtDevice_HapticPlay")?,
                haptic_stop: resolve(library, "CybSDK_VirtDevice_HapticStop")?,
                haptic_set_gain: resolve(library, "CybSDK_VirtDevice_HapticSetGain")?,
                haptic_set_frequency: resolve(library, "CybSDK_VirtDevice_HapticSetFrequency")?,
                haptic_set_volume: resolve(library, "CybSDK_VirtDevice_HapticSetVolume")?,
            })
        }
    }
}

/// A loaded copy of the vendor library
pub struct NativeLibrary {
    path: PathBuf,
    symbols: SymbolTable,
    // Must outlive every pointer in `symbols`; dropped last.
    _library: Library,
}

impl NativeLibrary {
    /// Load the library from an explicit path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading native SDK from {}", path.display());

        // SAFETY: loading runs the library's initialisers; the vendor library
        // has no unusual init requirements.
        let library = unsafe { Library::new(&path) }.map_err(|source| {
            DeviceError::LibraryLoad {
                path: path.clone(),
                source,
            }
        })?;

        // SAFETY: the library is CybSDK_Native; signatures checked in `ffi`.
        let symbols = unsafe { SymbolTable::load(&library)? };

        info!("Loaded native SDK from {}", path.display());
        Ok(Self {
            path,
            symbols,
            _library: library,
        })
    }

    /// Load from the first default location that works
    ///
    /// See [`default_search_paths`] for the order tried. The error from the
    /// last candidate is returned if none load.
    pub fn load_default() -> Result<Self, DeviceError> {
        let mut last_err = None;
        for candidate in default_search_paths() {
            match Self::load(&candidate) {
                Ok(lib) => return Ok(lib),
                Err(e @ DeviceError::MissingSymbol { .. }) => return Err(e),
                Err(e) => {
                    debug!("Candidate {} failed: {}", candidate.display(), e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| DeviceError::DeviceNotFound("no library candidates".into())))
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

impl std::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Architecture subdirectory the vendor ships its binaries in
pub fn arch_dir() -> &'static str {
    if cfg!(target_pointer_width = "64") {
        "x64"
    } else {
        "x86"
    }
}

/// Platform file name of the vendor library (e.g. `CybSDK_Native.dll`)
pub fn library_file_name() -> OsString {
    libloading::library_filename(LIBRARY_NAME)
}

/// Candidate locations, in order:
///
/// 1. `$CYBSDK_NATIVE_PATH`
/// 2. `x64/` or `x86/` next to the working directory
/// 3. the bare file name (system loader search path)
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(3);
    if let Some(env_path) = std::env::var_os(LIBRARY_PATH_ENV) {
        if !env_path.is_empty() {
            paths.push(PathBuf::from(env_path));
        }
    }
    paths.push(Path::new(arch_dir()).join(library_file_name()));
    paths.push(PathBuf::from(library_file_name()));
    paths
}
