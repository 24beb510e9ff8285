//! Simple example of using sub-merge as a library.

use std::time::Duration;

use sub_merge::{AggregatorConfig, HttpFetcher, Pipeline};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AggregatorConfig::builder()
        .timeout(Duration::from_secs(15))
        .delay(Duration::from_millis(500))
        // allow tuic links alongside the usual ones
        .schemes(vec!["vmess://", "vless://", "ss://", "trojan://", "hysteria2://", "tuic://"])
        .build();

    let urls = sub_merge::parse_source_list(concat!(
        "https://raw.githubusercontent.com/barry-far/V2ray-Configs/main/Sub1.txt,\n",
        "https://raw.githubusercontent.com/mahdibland/V2RayAggregator/master/",
        "sub/sub_merge_base64.txt",
    ));

    let pipeline = Pipeline::new(config.clone(), HttpFetcher::new(&config)?);
    let report = pipeline.run(&urls, &CancellationToken::new()).await?;

    println!("{:?}", report.summary());
    for entry in report.aggregate.snapshot().iter().take(10) {
        println!("{entry}");
    }

    Ok(())
}
