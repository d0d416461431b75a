use std::env;

use cropyield_core::config::Config;
use cropyield_core::PredictionRequest;
use reqwest::blocking::Client;

/// Posts a sample Tamil request to a running server and prints the reply.
fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let url = env::args().nth(1).unwrap_or_else(|| config.get("probe.url").unwrap_or_else(|_| "http://127.0.0.1:5000/predict".to_string()));
    let request = PredictionRequest {
        crop_tamil: Some("நெல்".to_string()), // Tamil for "paddy"
        year: Some(2025.0),
        district_encoded: Some(3.0),
        season_encoded: Some(2.0),
        area: Some(1.5),
        temp: Some(28.5),
        humidity: Some(65.0),
        wind: Some(3.5),
        par: Some(200.0),
        sw_dwn: Some(10.0),
        soil_wetness: Some(0.5),
        rainfall: Some(50.0),
    };
    println!("🌾 cropyield-probe\n=================");
    println!("Target: {}", url);
    match Client::new().post(&url).json(&request).send() {
        Ok(resp) => {
            println!("✅ Status Code: {}", resp.status());
            let body: serde_json::Value = resp.json()?;
            println!("✅ Server Response: {}", body);
        }
        Err(e) => { println!("❌ Error contacting server: {}", e); }
    }
    Ok(())
}
