// protoc-gen-lbclient/src/main.rs

use std::fs;
use std::io::{self, Read, Write};

use anyhow::Context;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::FileDescriptorSet;

use protoc_gen_lbclient::generate;

fn main() -> anyhow::Result<()> {
    let args: Vec<_> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        // No arguments: we are being driven by protoc over stdin/stdout.
        None => run_plugin(),
        Some("--descriptor-set") => run_offline(&args),
        Some(_) => {
            print_usage(&args[0]);
            Ok(())
        }
    }
}

fn run_plugin() -> anyhow::Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("reading request from stdin")?;

    let request = CodeGeneratorRequest::decode(input.as_slice())
        .context("decoding CodeGeneratorRequest")?;
    eprintln!(
        "Read request ({} bytes, {} files to generate)",
        input.len(),
        request.file_to_generate.len()
    );

    let response = generate(&request)?;

    let mut output = Vec::new();
    response
        .encode(&mut output)
        .context("encoding CodeGeneratorResponse")?;
    io::stdout()
        .write_all(&output)
        .context("writing response to stdout")?;

    Ok(())
}

/// Offline mode: read a serialized FileDescriptorSet (protoc
/// --descriptor_set_out) instead of a compiler request and treat every file
/// in it as a unit to generate.
fn run_offline(args: &[String]) -> anyhow::Result<()> {
    let Some(input_path) = args.get(2) else {
        print_usage(&args[0]);
        anyhow::bail!("missing descriptor set path");
    };

    let descriptor_bytes = if input_path == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(input_path)?
    };
    eprintln!("Read descriptor set ({} bytes)", descriptor_bytes.len());

    let file_set = FileDescriptorSet::decode(descriptor_bytes.as_slice())
        .context("decoding FileDescriptorSet")?;
    let request = CodeGeneratorRequest {
        file_to_generate: file_set.file.iter().map(|f| f.name().to_string()).collect(),
        proto_file: file_set.file,
        ..Default::default()
    };

    let response = generate(&request)?;
    let mut code = String::new();
    for file in &response.file {
        code.push_str(file.content());
    }

    if let Some(out_path) = args.get(3) {
        fs::write(out_path, &code)?;
        eprintln!("Generated {}", out_path);
    } else {
        io::stdout().write_all(code.as_bytes())?;
    }

    Ok(())
}

fn print_usage(program: &str) {
    eprintln!("Load-balanced gRPC client stub generator");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  {program}                                 (as a protoc plugin)");
    eprintln!("  {program} --descriptor-set <desc.pb> [output.rs]");
    eprintln!("  {program} --descriptor-set - < desc.pb > output.rs");
    eprintln!();
    eprintln!("ARGUMENTS:");
    eprintln!("  desc.pb         FileDescriptorSet from protoc");
    eprintln!("  output.rs       Output Rust file (default: stdout)");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  protoc --lbclient_out=src/generated --lbclient_opt=registry_addr=http://127.0.0.1:8500 my.proto");
    eprintln!("  protoc --descriptor_set_out=desc.pb --include_imports my.proto");
    eprintln!("  {program} --descriptor-set desc.pb my.lb.rs");
}
