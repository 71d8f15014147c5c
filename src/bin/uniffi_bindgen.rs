//! Generates Swift and Kotlin bindings for the CookMate mobile apps.
//!
//! ## Usage
//!
//! Build the library first, then point the generator at it:
//! ```bash
//! cargo build --release
//! cargo run --features cli --bin uniffi-bindgen generate --library target/release/libcookmate_core.so --language swift --out-dir ./bindings/ios
//! cargo run --features cli --bin uniffi-bindgen generate --library target/release/libcookmate_core.so --language kotlin --out-dir ./bindings/android
//! ```

fn main() {
    uniffi::uniffi_bindgen_main()
}
