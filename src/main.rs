use lambda_runtime::{Error, service_fn};
use tracing::{error, info};

use ec2_domainjoin_trigger::aws;
use ec2_domainjoin_trigger::config::Config;
use ec2_domainjoin_trigger::ec2::Ec2Client;
use ec2_domainjoin_trigger::handler::function_handler;
use ec2_domainjoin_trigger::logging;
use ec2_domainjoin_trigger::ssm::SsmClient;
use ec2_domainjoin_trigger::trigger::{DomainJoinTrigger, TriggerSettings};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            return Err(e.into());
        }
    };
    logging::init(&config.log_format, &config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT"),
        build_date = env!("BUILD_DATE"),
        "EC2 domain join trigger starting"
    );

    // Clients are built once per container and reused across invocations
    let sdk_config = aws::load_sdk_config(config.region.as_deref()).await;
    config.display(&aws::region_name(&sdk_config));

    let trigger = DomainJoinTrigger::new(
        Ec2Client::new(&sdk_config),
        SsmClient::new(&sdk_config),
        TriggerSettings::from(&config),
    );

    let handler = service_fn(|event| function_handler(event, &trigger));
    if let Err(e) = lambda_runtime::run(handler).await {
        error!(
            error = %e,
            "Lambda runtime terminated with an error"
        );
        return Err(e);
    }

    Ok(())
}
