//! # circle-stego
//!
//! Command-line front end for the `circle_stego` library.
//!
//! ```bash
//! circle-stego -e <cover-image> <payload-file>   # writes encoded-image.png
//! circle-stego -d <image>                        # writes decoded-file
//! ```
//!
//! Environment overrides:
//! - `STEGO_ENCODED_OUTPUT`: where `-e` writes its PNG (default `encoded-image.png`)
//! - `STEGO_DECODED_OUTPUT`: where `-d` writes the payload (default `decoded-file`)
//! - `STEGO_RADIAL_STEP`: ring spacing, must match between encode and decode (default 2)
//! - `RUST_LOG`: log filter (default `info`)

use anyhow::{Context, Result, bail};
use circle_stego::{CodecConfig, DEFAULT_RADIAL_STEP, SteganographicCodec, image_helper};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ENCODED_OUTPUT: &str = "encoded-image.png";
const DEFAULT_DECODED_OUTPUT: &str = "decoded-file";

/// Hide a file inside an image, or recover it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["encode", "decode"])))]
struct Args {
    /// Hide PAYLOAD_FILE inside COVER_IMAGE and write the result as a PNG
    #[arg(short = 'e', num_args = 2, value_names = ["COVER_IMAGE", "PAYLOAD_FILE"])]
    encode: Option<Vec<PathBuf>>,

    /// Recover the payload hidden in IMAGE
    #[arg(short = 'd', value_name = "IMAGE")]
    decode: Option<PathBuf>,
}

enum Mode {
    Encode { cover: PathBuf, payload: PathBuf },
    Decode { image: PathBuf },
}

impl Args {
    fn mode(self) -> Result<Mode> {
        match (self.encode.as_deref(), self.decode) {
            (Some([cover, payload]), None) => Ok(Mode::Encode {
                cover: cover.clone(),
                payload: payload.clone(),
            }),
            (None, Some(image)) => Ok(Mode::Decode { image }),
            _ => bail!("expected exactly one of `-e <cover-image> <payload-file>` or `-d <image>`"),
        }
    }
}

/// Output locations and codec settings, read from the environment.
#[derive(Debug, Clone)]
struct CliConfig {
    encoded_output: PathBuf,
    decoded_output: PathBuf,
    codec: CodecConfig,
}

impl CliConfig {
    fn from_env() -> Result<Self> {
        let encoded_output = std::env::var("STEGO_ENCODED_OUTPUT")
            .unwrap_or_else(|_| DEFAULT_ENCODED_OUTPUT.to_string());
        let decoded_output = std::env::var("STEGO_DECODED_OUTPUT")
            .unwrap_or_else(|_| DEFAULT_DECODED_OUTPUT.to_string());
        let radial_step = std::env::var("STEGO_RADIAL_STEP")
            .ok()
            .map(|value| value.parse::<u32>())
            .transpose()
            .context("STEGO_RADIAL_STEP must be a positive integer")?
            .unwrap_or(DEFAULT_RADIAL_STEP);

        Ok(Self {
            encoded_output: encoded_output.into(),
            decoded_output: decoded_output.into(),
            codec: CodecConfig { radial_step },
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mode = Args::parse().mode()?;
    let config = CliConfig::from_env()?;
    let codec = SteganographicCodec::new(config.codec).context("Invalid codec configuration")?;

    match mode {
        Mode::Encode { cover, payload } => encode(codec, cover, payload, config.encoded_output).await,
        Mode::Decode { image } => decode(codec, image, config.decoded_output).await,
    }
}

async fn encode(
    codec: SteganographicCodec,
    cover_path: PathBuf,
    payload_path: PathBuf,
    output_path: PathBuf,
) -> Result<()> {
    let payload = tokio::fs::read(&payload_path)
        .await
        .with_context(|| format!("Failed to read payload file {}", payload_path.display()))?;
    info!(path = %payload_path.display(), bytes = payload.len(), "Read payload");

    let written = output_path.clone();
    let header = tokio::task::spawn_blocking(move || -> Result<u32> {
        let mut cover = image_helper::load(&cover_path)
            .with_context(|| format!("Failed to open cover image {}", cover_path.display()))?;
        info!(
            width = cover.width(),
            height = cover.height(),
            capacity = codec.capacity(&cover),
            "Loaded cover image"
        );
        let header = codec.encode(&mut cover, &payload)?;
        image_helper::save(&output_path, &cover)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(header)
    })
    .await
    .context("Encoding task panicked")??;

    info!(path = %written.display(), header, "Wrote encoded image");
    Ok(())
}

async fn decode(codec: SteganographicCodec, image_path: PathBuf, output_path: PathBuf) -> Result<()> {
    let payload = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        let image = image_helper::load(&image_path)
            .with_context(|| format!("Failed to open image {}", image_path.display()))?;
        Ok(codec.decode(&image)?)
    })
    .await
    .context("Decoding task panicked")??;

    tokio::fs::write(&output_path, &payload)
        .await
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    info!(path = %output_path.display(), bytes = payload.len(), "Wrote decoded payload");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Mode> {
        let args = Args::try_parse_from(args)?;
        args.mode()
    }

    #[test]
    fn encode_takes_cover_and_payload() {
        match parse(&["circle-stego", "-e", "cover.png", "secret.bin"]).unwrap() {
            Mode::Encode { cover, payload } => {
                assert_eq!(cover, PathBuf::from("cover.png"));
                assert_eq!(payload, PathBuf::from("secret.bin"));
            }
            Mode::Decode { .. } => panic!("expected encode mode"),
        }
    }

    #[test]
    fn decode_takes_one_image() {
        match parse(&["circle-stego", "-d", "encoded-image.png"]).unwrap() {
            Mode::Decode { image } => assert_eq!(image, PathBuf::from("encoded-image.png")),
            Mode::Encode { .. } => panic!("expected decode mode"),
        }
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(parse(&["circle-stego"]).is_err());
        assert!(parse(&["circle-stego", "-e", "cover.png"]).is_err());
        assert!(parse(&["circle-stego", "-d"]).is_err());
        assert!(parse(&["circle-stego", "-e", "a.png", "b.bin", "-d", "c.png"]).is_err());
        assert!(parse(&["circle-stego", "-x", "a.png"]).is_err());
        assert!(parse(&["circle-stego", "-d", "a.png", "extra"]).is_err());
    }
}
