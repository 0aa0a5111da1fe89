fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::var("OUT_DIR")?;
    let descriptor_path = std::path::Path::new(&out_dir).join("paas_descriptor.bin");

    // Messages + gRPC services, plus the descriptor set used for server reflection
    tonic_prost_build::configure()
        .file_descriptor_set_path(&descriptor_path)
        .compile_protos(&["proto/paas.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/paas.proto");

    Ok(())
}
