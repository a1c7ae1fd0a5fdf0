fn main() {
    // Compile Slint UI
    slint_build::compile("ui/booth.slint").unwrap();

    #[cfg(target_os = "windows")]
    {
        println!("cargo:rerun-if-changed=build.rs");
    }
}
