use anyhow::{anyhow, bail, Context};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use waymap::{ClientConfig, HttpBackend, LatLng, Map, MapClient, Notification, OptimizationOutcome};

const HELP: &str = "commands:
  demand <n>                  demand for the next click
  click <lat> <lon>           click the map (creates a waypoint)
  optimize <vehicles> <cap>   request a route plan
  refresh                     reload waypoints from the server
  status                      show what the map displays
  quit";

type Client = MapClient<HttpBackend, Map>;

#[derive(Debug, PartialEq)]
enum Command {
    Demand(i64),
    Click(LatLng),
    Optimize { vehicles: u32, capacity: u32 },
    Refresh,
    Status,
    Help,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("demand", [n]) => Command::Demand(n.parse().context("demand must be an integer")?),
            ("click", [lat, lon]) => Command::Click(LatLng::new(
                lat.parse().context("latitude must be a number")?,
                lon.parse().context("longitude must be a number")?,
            )),
            ("optimize", [vehicles, capacity]) => Command::Optimize {
                vehicles: vehicles.parse().context("vehicle count must be a positive integer")?,
                capacity: capacity.parse().context("capacity must be a non-negative integer")?,
            },
            ("refresh", []) => Command::Refresh,
            ("status", []) => Command::Status,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => bail!("unrecognized command '{}', type 'help'", line.trim()),
        };
        Ok(command)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    waymap::init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::load(&path).with_context(|| format!("reading config {}", path))?,
        None => ClientConfig::default(),
    }
    .apply_env()?;
    log::info!("backend at {}", config.backend_url);

    let notifier = Arc::new(|notification: &Notification| eprintln!("! {}", notification));
    let client = Arc::new(Client::from_config(config, notifier)?);

    if let Err(e) = client.startup().await {
        log::warn!("starting without waypoints: {}", e);
    }
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => run(&client, command).await,
            Err(e) => eprintln!("{:#}", e),
        }
    }

    Ok(())
}

async fn run(client: &Arc<Client>, command: Command) {
    // Failures reach the operator through the notifier; nothing else to print
    let result = match command {
        Command::Demand(demand) => {
            client.set_demand(demand);
            Ok(())
        }
        Command::Click(lat_lng) => client.click(lat_lng).await.map(|_| ()),
        Command::Optimize { vehicles, capacity } => {
            let pending = client.spawn_optimize(vehicles, capacity);
            tokio::spawn(async move {
                match pending.await {
                    Ok(Ok(OptimizationOutcome::Planned(plan))) => println!(
                        "{} routes, {:.1} km in total",
                        plan.len(),
                        plan.total_length_meters() / 1000.0
                    ),
                    Ok(Ok(OptimizationOutcome::Superseded { sequence })) => {
                        log::debug!("optimization #{} superseded", sequence)
                    }
                    Ok(_) => {}
                    Err(e) => log::error!("optimization task failed: {}", e),
                }
            });
            Ok(())
        }
        Command::Refresh => client.refresh().await,
        Command::Status => {
            println!("{}", client.status());
            for waypoint in client.waypoints() {
                println!("  {} {}", waypoint.position(), waypoint.label());
            }
            Ok(())
        }
        Command::Help => {
            println!("{}", HELP);
            Ok(())
        }
        Command::Quit => Ok(()),
    };

    if let Err(e) = result {
        log::debug!("command failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("demand 5".parse::<Command>().unwrap(), Command::Demand(5));
        assert_eq!(
            "click 45.383402 -71.932936".parse::<Command>().unwrap(),
            Command::Click(LatLng::new(45.383402, -71.932936))
        );
        assert_eq!(
            "optimize 3 100".parse::<Command>().unwrap(),
            Command::Optimize {
                vehicles: 3,
                capacity: 100
            }
        );
        assert_eq!("  status ".parse::<Command>().unwrap(), Command::Status);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("demand".parse::<Command>().is_err());
        assert!("demand five".parse::<Command>().is_err());
        assert!("optimize -1 10".parse::<Command>().is_err());
        assert!("fly 1 2".parse::<Command>().is_err());
    }
}
