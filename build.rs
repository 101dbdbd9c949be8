use shadow_rs::ShadowBuilder;

fn main() {
    // Version and git metadata for `notify-relay --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
    println!("cargo:rerun-if-changed=build.rs");
}
