use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use cr2fits::image_pipeline::{ChannelSelect, ConversionConfig, RawToFitsPipeline};
use cr2fits::logger;
use tracing::{error, info};

const USAGE: &str = "\
Usage: cr2fits <raw-file> <color-index>
The <color-index> can take one of 4 values: 0,1,2,3 for R,G,B and unscaled raw respectively.
Example:
    $ cr2fits myimage.cr2 1
The above example will create myimage-G.fits, the FITS image in the green channel.";

fn convert(input: &str, channel: ChannelSelect) -> anyhow::Result<PathBuf> {
    let config = ConversionConfig::builder().channel(channel).build();
    let pipeline = RawToFitsPipeline::new(config);
    pipeline
        .convert_file(input)
        .with_context(|| format!("failed to convert {input}"))
}

fn main() -> ExitCode {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [input, index] = args.as_slice() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let Some(channel) = index
        .parse::<usize>()
        .ok()
        .and_then(ChannelSelect::from_index)
    else {
        eprintln!("ERROR: color index must be one of 0:Red, 1:Green, 2:Blue, 3:Raw");
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    info!("Reading file {input}...");
    match convert(input, channel) {
        Ok(destination) => {
            info!("Conversion successful: {}", destination.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Conversion failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
