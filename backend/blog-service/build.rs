// Build script for blog-service
// Compiles blog_service.proto for the gRPC server, the test client and server reflection
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let services_dir = "../proto/services";
    let third_party_dir = "../proto/third_party";

    println!("cargo:rerun-if-changed={}/blog_service.proto", services_dir);
    println!(
        "cargo:rerun-if-changed={}/google/protobuf/timestamp.proto",
        third_party_dir
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    tonic_build::configure()
        .compile_well_known_types(false)
        .extern_path(".google.protobuf.Timestamp", "::prost_types::Timestamp")
        .build_server(true)
        .build_client(true) // Client code is used by the integration tests
        .file_descriptor_set_path(out_dir.join("blog_descriptor.bin"))
        .compile_protos(
            &[format!("{services_dir}/blog_service.proto")],
            &[services_dir, third_party_dir],
        )?;

    Ok(())
}
