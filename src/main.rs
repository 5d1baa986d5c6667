// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GetSetRide command-line client
//!
//! Browse listings, quote and book cars, and manage bookings against the
//! GetSetRide marketplace API.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use getsetride::{
    booking::{quote_from_strs, BookOutcome, CarRef, CostBreakdown, SubmitOutcome},
    config::Config,
    models::{BookingStatus, CarFilters},
    session::{FileStorage, SessionStore},
    time_utils::{parse_date, parse_time},
    Marketplace,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "getsetride", version, about = "GetSetRide marketplace client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price a rental without contacting the server
    Quote {
        #[arg(long)]
        price: f64,
        /// Pickup date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Return date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// Overrides SERVICE_FEE_RATE
        #[arg(long)]
        fee_rate: Option<f64>,
    },
    /// Search listings
    Cars {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Show one listing
    Car { id: String },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GETSETRIDE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        remember_me: bool,
    },
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Book a car
    Book {
        car_id: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Pickup time (HH:MM)
        #[arg(long)]
        pickup: Option<String>,
        /// Dropoff time (HH:MM)
        #[arg(long)]
        dropoff: Option<String>,
        /// Confirm the shown price without asking again
        #[arg(long)]
        yes: bool,
    },
    /// List your bookings
    Bookings {
        #[arg(long)]
        status: Option<String>,
    },
    /// Cancel a booking
    Cancel {
        id: String,
        #[arg(long, default_value = "Cancelled by user")]
        reason: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    if let Command::Quote {
        price,
        start,
        end,
        fee_rate,
    } = &cli.command
    {
        let cost = quote_from_strs(start, end, *price, fee_rate.unwrap_or(config.service_fee_rate));
        print_breakdown(*price, &cost);
        return Ok(());
    }

    let session = SessionStore::restore(Arc::new(FileStorage::new(&config.session_file)));
    tracing::debug!(api = %config.api_base_url, authenticated = session.check_auth(), "Client ready");
    let market = Marketplace::new(config, session)?;

    match cli.command {
        Command::Quote { .. } => {}
        Command::Cars {
            city,
            category,
            search,
            max_price,
            page,
        } => {
            let filters = CarFilters {
                city,
                category,
                search,
                max_price,
                page,
                ..Default::default()
            };
            let results = market.cars.list(&filters).await?;
            for car in &results.cars {
                let availability = if car.is_active { "" } else { " (unavailable)" };
                println!(
                    "{}  {:<30} {:>10.2}/day  {}{}",
                    car.id,
                    car.title(),
                    car.price_per_day,
                    car.location.city,
                    availability
                );
            }
            println!(
                "page {} of {} ({} cars)",
                results.current_page, results.total_pages, results.total
            );
        }
        Command::Car { id } => {
            let car = market.cars.get(&id).await?;
            println!("{} ({})", car.title(), car.id);
            println!("  {} / {} / {} seats", car.transmission, car.fuel_type, car.seats);
            println!("  {}, {}", car.location.city, car.location.state);
            println!("  {:.2} per day", car.price_per_day);
            if !car.features.is_empty() {
                println!("  features: {}", car.features.join(", "));
            }
        }
        Command::Login {
            email,
            password,
            remember_me,
        } => {
            let user = market.auth.login(&email, &password, remember_me).await?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        Command::Logout => {
            market.auth.logout();
            println!("Logged out");
        }
        Command::Whoami => match market.auth.current_user() {
            Some(user) => println!("{} <{}> ({:?})", user.name, user.email, user.role),
            None => println!("Not logged in"),
        },
        Command::Book {
            car_id,
            start,
            end,
            pickup,
            dropoff,
            yes,
        } => book(&market, &car_id, &start, &end, pickup, dropoff, yes).await?,
        Command::Bookings { status } => {
            let status = status
                .map(|s| serde_json::from_value::<BookingStatus>(serde_json::Value::String(s)))
                .transpose()
                .context("Unknown booking status")?;
            let bookings = market.bookings.list_my_bookings(status).await?;
            let now = Utc::now();
            for booking in &bookings {
                println!(
                    "{}  {} -> {}  {:<10} {:?}",
                    booking.id,
                    booking.start_date,
                    booking.end_date,
                    booking.status.as_str(),
                    booking.category(now)
                );
            }
            if bookings.is_empty() {
                println!("No bookings yet");
            }
        }
        Command::Cancel { id, reason } => {
            let current = market.bookings.get(&id).await?;
            if !current.status.is_cancellable() {
                bail!(
                    "Booking {} is {} and can no longer be cancelled",
                    current.id,
                    current.status.as_str()
                );
            }
            let booking = market.bookings.cancel_booking(&id, &reason).await?;
            println!("Booking {} is now {}", booking.id, booking.status.as_str());
        }
    }

    Ok(())
}

async fn book(
    market: &Marketplace,
    car_id: &str,
    start: &str,
    end: &str,
    pickup: Option<String>,
    dropoff: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    let car = market.cars.get(car_id).await?;
    let flow = market.booking_flow(CarRef::from(&car));

    flow.set_dates(parse_date(start), parse_date(end))?;
    if let Some(time) = pickup.as_deref() {
        flow.set_pickup_time(parse_time(time).context("Pickup time must be HH:MM")?)?;
    }
    if let Some(time) = dropoff.as_deref() {
        flow.set_dropoff_time(parse_time(time).context("Dropoff time must be HH:MM")?)?;
    }

    let cost = match flow.request_booking()? {
        BookOutcome::Confirming(cost) => cost,
        BookOutcome::AuthRequired => bail!("Please log in first: getsetride login --email <email>"),
        BookOutcome::Rejected(reason) => bail!("{}", reason),
    };

    println!("{}", car.title());
    print_breakdown(car.price_per_day, &cost);

    if !yes {
        flow.cancel_confirmation()?;
        println!("Not booked. Re-run with --yes to confirm this price.");
        return Ok(());
    }

    match flow.confirm().await {
        SubmitOutcome::Succeeded(booking) => {
            println!("Booking {} created ({})", booking.id, booking.status.as_str());
            Ok(())
        }
        SubmitOutcome::Failed(err) => bail!("{}", err.user_message()),
        SubmitOutcome::Ignored => bail!("Booking was not submitted"),
    }
}

fn print_breakdown(price_per_day: f64, cost: &CostBreakdown) {
    if !cost.is_bookable() {
        println!("Choose a return date after the pickup date.");
        return;
    }
    println!("  {:.2} x {} days   {:>10.2}", price_per_day, cost.days, cost.subtotal);
    println!("  Service fee          {:>10.2}", cost.service_fee);
    println!("  Total                {:>10.2}", cost.total);
}

/// Initialize logging to stderr; JSON when `LOG_FORMAT=json`.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("getsetride=info,warn"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
