// Build script for auth-service
// Compiles auth_service.proto for gRPC server and client code generation
fn main() {
    println!("cargo:rerun-if-changed=../proto/auth_service.proto");

    // Vendored protoc so the build does not depend on a system install
    let protoc = protoc_bin_vendored::protoc_bin_path().expect("Failed to locate vendored protoc");
    std::env::set_var("PROTOC", protoc);

    // Client code is also generated for integration tests
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["../proto/auth_service.proto"], &["../proto"])
        .expect("Failed to compile auth_service.proto");
}
