mod parse;

use crate::parse::{Args, Command};
use chrono::Utc;
use clap::Parser;
use finscan::chat::reply_text;
use finscan::export::save_to_csv;
use finscan::time::format_timestamp;
use finscan::{ApiConfig, CanonicalCatch, FishApiClient, UploadFile};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

pub fn unique_species(catches: &[CanonicalCatch]) -> usize {
    catches
        .iter()
        .map(|c| &c.name)
        .collect::<HashSet<_>>()
        .len()
}

pub fn catch_line(index: usize, catch: &CanonicalCatch) -> String {
    format!(
        "#{:03} {} · {} [{}]",
        index + 1,
        catch.name,
        format_timestamp(&catch.created_at, Utc::now()),
        catch.id
    )
}

pub fn print_summary(catches: &[CanonicalCatch]) {
    if catches.is_empty() {
        println!("No fish caught yet");
        return;
    }

    for (index, catch) in catches.iter().enumerate() {
        println!("{}", catch_line(index, catch));
    }
    println!("\nTotal catches: {}", catches.len());
    println!("Unique species: {}", unique_species(catches));
}

pub fn print_details(catch: &CanonicalCatch) {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    println!("{}", catch.name);
    println!("  Id:           {}", catch.id);
    println!("  Family:       {}", or_dash(&catch.family));
    println!("  Water type:   {}", or_dash(&catch.water_type));
    println!("  Size:         {}", catch.size_range());
    println!("  Depth:        {}", catch.depth_range());
    println!("  Environment:  {}", or_dash(&catch.environment));
    println!("  Region:       {}", or_dash(&catch.region));
    println!("  Conservation: {}", or_dash(&catch.conservation_status));
    println!("  AI accuracy:  {}", catch.accuracy_label());
    println!("  Captured:     {}", format_timestamp(&catch.created_at, Utc::now()));
    println!("  Image:        {}", or_dash(&catch.image_url));
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_catches(catches: &[CanonicalCatch], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        print_json(&catches)
    } else {
        print_summary(catches);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let config = ApiConfig::new()
        .with_base_url(&args.base_url)
        .with_device_id(&args.device_id);
    let client = FishApiClient::new(config)?;
    info!("Using {} as device {}", client.config().api_base(), client.device_id());

    match args.command {
        Command::Register => print_json(&client.register_device().await?)?,
        Command::Device => print_json(&client.get_device().await?)?,
        Command::List => print_catches(&client.get_fish_by_device().await?, args.json)?,
        Command::Recent { limit } => {
            print_catches(&client.get_recent_catches(limit).await?, args.json)?
        }
        Command::Details { id } => match client.get_catch_details(&id).await? {
            Some(catch) if args.json => print_json(&catch)?,
            Some(catch) => print_details(&catch),
            None => println!("Fish not found: {}", id),
        },
        Command::Name { name } => print_json(&client.check_fish_by_name(&name).await?)?,
        Command::AddExisting { name, image_url } => {
            print_json(&client.add_existing_fish_to_device(&name, &image_url).await?)?
        }
        Command::Identify { path, mime } => {
            let mut file = UploadFile::from_path(&path).await?;
            if let Some(mime) = mime {
                file = file.with_mime_type(&mime);
            }

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message(format!("Identifying {}", path.display()));
            let result = client.identify_fish(file).await;
            spinner.finish_and_clear();

            print_json(&result?)?
        }
        Command::Chat { message } => {
            let response = client.send_chat_message(&message).await?;
            println!("{}", reply_text(&response));
        }
        Command::Home { limit } => {
            let (device, recent) =
                futures::try_join!(client.get_device(), client.get_recent_catches(limit))?;
            print_json(&device)?;
            println!();
            print_catches(&recent, args.json)?;
        }
        Command::Export { output } => {
            let catches = client.get_fish_by_device().await?;
            save_to_csv(&catches, &output)?;
            println!("Saved {} catches to {}", catches.len(), output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finscan::ImageResolver;
    use finscan::record::to_canonical;
    use serde_json::json;

    fn catch(name: &str) -> CanonicalCatch {
        to_canonical(
            json!({"_id": "9", "fish": {"name": name}}),
            &ImageResolver::new("http://localhost:3000/api"),
        )
    }

    #[test]
    fn test_unique_species() {
        let catches = vec![catch("Cod"), catch("Tang"), catch("Cod")];
        assert_eq!(unique_species(&catches), 2);
        assert_eq!(unique_species(&[]), 0);
    }

    #[test]
    fn test_catch_line() {
        assert_eq!(catch_line(0, &catch("Cod")), "#001 Cod · Unknown [9]");
        assert_eq!(catch_line(41, &catch("Tang")), "#042 Tang · Unknown [9]");
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["finscan", "recent"]).unwrap();
        assert_eq!(args.base_url, "http://localhost:3000/api");
        assert_eq!(args.device_id, "testtest");
        assert!(matches!(args.command, Command::Recent { limit: 6 }));
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "finscan",
            "--base-url",
            "https://fish.example.com/api",
            "-d",
            "reef-7",
            "add-existing",
            "Blue Tang",
            "dev/tang.jpg",
        ])
        .unwrap();
        assert_eq!(args.base_url, "https://fish.example.com/api");
        assert_eq!(args.device_id, "reef-7");
        match args.command {
            Command::AddExisting { name, image_url } => {
                assert_eq!(name, "Blue Tang");
                assert_eq!(image_url, "dev/tang.jpg");
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
