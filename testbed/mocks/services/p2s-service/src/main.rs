use p2s_service_mock::{MockService, ServiceFixture};
use std::env;
use std::fs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let addr = env::var("P2S_MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:8152".to_string());

    let fixture = match env::var("P2S_MOCK_FIXTURE") {
        Ok(path) => {
            log::info!("Loading fixture from {}", path);
            ServiceFixture::from_yaml(&fs::read_to_string(&path)?)?
        }
        Err(_) => {
            log::info!("No fixture file given, using the default twelve-slide run");
            ServiceFixture::completed_run()
        }
    };

    let service = MockService::start_on(&addr, fixture).await?;
    println!("Mock Paper2Slides service on {}", service.address());
    service.run_until_ctrl_c().await
}
