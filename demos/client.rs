use argh::FromArgs;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::path::PathBuf;

mod messages;

// defaults for the client
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 3000;

#[derive(FromArgs)]
/// Client for the cv-bridge HTTP demo server
struct ClientArgs {
    /// the host to connect to
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to connect to
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// command to execute: "version", "methods" or "apply"
    #[argh(subcommand)]
    command: ClientCommands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum ClientCommands {
    Version(VersionCommand),
    Methods(MethodsCommand),
    Apply(ApplyCommand),
}

#[derive(FromArgs)]
/// Print the OpenCV version of the server
#[argh(subcommand, name = "version")]
struct VersionCommand {}

#[derive(FromArgs)]
/// List the methods the server answers
#[argh(subcommand, name = "methods")]
struct MethodsCommand {}

#[derive(FromArgs)]
/// Send an image through one operation
#[argh(subcommand, name = "apply")]
struct ApplyCommand {
    /// the method name, e.g. gaussianBlur
    #[argh(option, short = 'm')]
    method: String,

    /// the path to the input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// operation arguments as a JSON object, e.g. '{"kernelSize":[5,5],"sigmaX":0}'
    #[argh(option, short = 'a', default = "String::from(\"{}\")")]
    args: String,

    /// where to write the resulting image
    #[argh(option, short = 'o')]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: ClientArgs = argh::from_env();

    let client = reqwest::Client::new();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    match args.command {
        ClientCommands::Version(_) => {
            let response = client
                .post(format!("http://{}/call", addr))
                .json(&messages::CallRequest {
                    method: "getVersion".to_string(),
                    arguments: Default::default(),
                })
                .send()
                .await?;

            let result = response.json::<messages::CallResponse>().await?;
            println!("Result: {}", serde_json::to_string_pretty(&result)?);
        }
        ClientCommands::Methods(_) => {
            let response = client
                .get(format!("http://{}/methods", addr))
                .send()
                .await?;

            let result = response.json::<serde_json::Value>().await?;
            println!("Result: {}", serde_json::to_string_pretty(&result)?);
        }
        ClientCommands::Apply(apply) => {
            let mut arguments: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(&apply.args)?;
            arguments.insert("pathType".into(), 2.into());
            arguments.insert("pathString".into(), "".into());
            arguments.insert(
                "data".into(),
                STANDARD.encode(std::fs::read(&apply.image_path)?).into(),
            );

            let response = client
                .post(format!("http://{}/call", addr))
                .json(&messages::CallRequest {
                    method: apply.method,
                    arguments,
                })
                .send()
                .await?;

            match response.json::<messages::CallResponse>().await? {
                messages::CallResponse::Success {
                    result: messages::ResultPayload::Bytes(encoded),
                } => {
                    std::fs::write(&apply.output, STANDARD.decode(encoded)?)?;
                    println!("Wrote {}", apply.output.display());
                }
                other => println!("Result: {}", serde_json::to_string_pretty(&other)?),
            }
        }
    }

    Ok(())
}
