// SPDX-License-Identifier: Apache-2.0

//! Compile-time configuration validation
//!
//! Integer width and float handling are selected with Cargo features. This
//! module rejects combinations that would leave the number model ambiguous.

#[cfg(not(any(feature = "int32", feature = "int64")))]
compile_error!("No integer width features selected: choose one of 'int32' or 'int64'");

#[cfg(all(feature = "int32", feature = "int64"))]
compile_error!(
    "Cannot enable both 'int32' and 'int64' features simultaneously: choose one integer width"
);

#[cfg(all(feature = "float-error", feature = "float-truncate"))]
compile_error!("Cannot enable both 'float-error' and 'float-truncate' features simultaneously");

#[cfg(all(feature = "float", feature = "float-error"))]
compile_error!("Cannot enable both 'float' and 'float-error' features: 'float-error' is only for when float parsing is disabled");

#[cfg(all(feature = "float", feature = "float-truncate"))]
compile_error!("Cannot enable both 'float' and 'float-truncate' features: 'float-truncate' is only for when float parsing is disabled");

// A float literal needs somewhere to go
#[cfg(not(any(feature = "float", feature = "float-error", feature = "float-truncate")))]
compile_error!(
    "No float behavior selected: enable 'float', or one of 'float-error' / 'float-truncate'"
);
