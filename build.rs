fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto");

    let file_descriptors = protox::compile(
        ["tfplugin6.proto", "grpc_controller.proto"],
        ["proto"],
    )?;

    tonic_build::configure()
        .build_client(false)
        .compile_fds(file_descriptors)?;

    Ok(())
}
