use std::env;
use std::path::PathBuf;

fn main() {
    // Only run bindgen and linking logic if the `xeneth-sdk` feature is enabled.
    // This allows the crate to compile without the SDK if the feature is not active.
    #[cfg(feature = "xeneth-sdk")]
    {
        println!("cargo:rerun-if-env-changed=XENETH_SDK_DIR");
        println!("cargo:rerun-if-changed=wrapper.h");

        let sdk_dir = env::var("XENETH_SDK_DIR").expect(
            "XENETH_SDK_DIR environment variable must be set when `xeneth-sdk` feature is enabled.",
        );

        let sdk_include_path = PathBuf::from(&sdk_dir).join("Include");

        // Allow XENETH_LIB_DIR to override the default lib path
        let sdk_lib_path = if let Ok(lib_dir) = env::var("XENETH_LIB_DIR") {
            PathBuf::from(lib_dir)
        } else {
            PathBuf::from(&sdk_dir).join("Lib")
        };

        if !sdk_include_path.exists() {
            panic!(
                "Xeneth SDK include path does not exist: {:?}",
                sdk_include_path
            );
        }
        // The lib path might not exist if libraries are installed globally,
        // but it's a common place. Warn rather than panic.
        if !sdk_lib_path.exists() {
            eprintln!(
                "Warning: Xeneth SDK lib path does not exist: {:?}",
                sdk_lib_path
            );
        }

        // Generate bindings
        let bindings = bindgen::Builder::default()
            .header("wrapper.h")
            .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
            .clang_arg(format!("-I{}", sdk_include_path.display()))
            // Camera-scope and discovery-scope entry points
            .allowlist_function("XC_.*")
            .allowlist_function("XCD_.*")
            // Handle, error code and callback typedefs
            .allowlist_type("XCHANDLE")
            .allowlist_type("ErrCode")
            .allowlist_type("XStatus")
            .allowlist_type("XDeviceInformation")
            .allowlist_type("XDeviceStates")
            .allowlist_type("XEnumerationFlags?")
            .allowlist_type("XPropType")
            .allowlist_type("FrameType")
            .allowlist_type("XGetFrameFlags")
            .allowlist_type("XPFF.*")
            .allowlist_var("XEF_.*")
            .allowlist_var("XGF_.*")
            .allowlist_var("XLC_.*")
            .allowlist_var("I_OK|I_DIRTY|E_.*")
            .default_enum_style(bindgen::EnumVariation::Rust {
                non_exhaustive: false,
            })
            .generate()
            .expect("Unable to generate bindings");

        let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
        bindings
            .write_to_file(out_path.join("bindings.rs"))
            .expect("Couldn't write bindings!");

        // Link to the Xeneth library
        println!("cargo:rustc-link-search=native={}", sdk_lib_path.display());

        #[cfg(target_os = "windows")]
        {
            println!("cargo:rustc-link-lib=xeneth64");
        }
        #[cfg(not(target_os = "windows"))]
        {
            println!("cargo:rustc-link-lib=xeneth");
        }
    }
    #[cfg(not(feature = "xeneth-sdk"))]
    {
        // If the xeneth-sdk feature is not enabled, create a dummy bindings file
        // to allow src/lib.rs to compile without actual SDK presence.
        let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
        std::fs::write(
            out_path.join("bindings.rs"),
            "// Dummy bindings when xeneth-sdk feature is not enabled\n",
        )
        .expect("Couldn't write dummy bindings!");
    }
}
