use crate::infra::{InMemoryMeasurementStore, InMemoryReferenceStore};
use crate::seed;
use chrono::Utc;
use clap::Args;
use std::sync::Arc;

use courier_fees::error::AppError;
use courier_fees::pricing::{CityId, DeliveryFeeService, ReferenceStore, VehicleId};
use courier_fees::weather::{MeasurementStore, WeatherMeasurement};

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// City id from the seeded reference data (1 Tallinn, 2 Tartu, 3 Pärnu)
    #[arg(long)]
    pub(crate) city_id: u64,
    /// Vehicle id from the seeded reference data (1 car, 2 scooter, 3 bike)
    #[arg(long)]
    pub(crate) vehicle_id: u64,
    /// Simulated air temperature in °C
    #[arg(long)]
    pub(crate) air_temperature: Option<f32>,
    /// Simulated wind speed in m/s
    #[arg(long)]
    pub(crate) wind_speed: Option<f32>,
    /// Simulated weather phenomenon text
    #[arg(long)]
    pub(crate) phenomenon: Option<String>,
}

/// Price one delivery against the seeded tables and a simulated
/// measurement, printing the breakdown the HTTP endpoint would return.
pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let reference = Arc::new(InMemoryReferenceStore::new(seed::reference_data()));
    let measurements = Arc::new(InMemoryMeasurementStore::default());
    let service = DeliveryFeeService::new(measurements.clone(), reference.clone());

    let city_id = CityId(args.city_id);
    if let Ok(Some(city)) = reference.city(&city_id) {
        let row = WeatherMeasurement {
            station: city.station.code,
            observed_at: Utc::now(),
            air_temperature: args.air_temperature,
            wind_speed: args.wind_speed,
            phenomenon: args.phenomenon.clone(),
        };
        if let Err(err) = measurements.record(vec![row]) {
            println!("Could not record the simulated measurement: {err}");
            return Ok(());
        }
        println!(
            "Simulated observation for {} ({}, station {}): temperature {:?} °C, wind {:?} m/s, phenomenon {:?}",
            city.name, city.station.name, city.station.code, args.air_temperature, args.wind_speed, args.phenomenon
        );
    }

    match service.quote(city_id, VehicleId(args.vehicle_id)) {
        Ok(quote) => {
            println!("Delivery fee for city {} / vehicle {}", quote.city_id, quote.vehicle_id);
            println!("- base fee:  {}", quote.base_fee);
            println!("- extra fee: {}", quote.extra_fee);
            println!("- total fee: {}", quote.total_fee);
        }
        Err(err) => println!("Quote rejected: {err}"),
    }

    Ok(())
}
