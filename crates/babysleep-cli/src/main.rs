use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "babysleep", version, about = "Baby sleep scheduler: predict and track sleep patterns")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model on historical sleep data
    Train,
    /// Predict today's schedule from the morning wake time
    Predict {
        /// Morning wake time (HH:MM)
        wake_time: String,
    },
    /// Correct an event with its actual times
    Correct {
        /// Event to correct: 'wake', a nap number, or 'night'
        target: String,
        /// Actual start time (HH:MM)
        start: String,
        /// Actual end time (HH:MM); omit while the event is in progress
        end: Option<String>,
    },
    /// Add a completed day to the sleep log
    Add {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Morning wake time (HH:MM)
        #[arg(long)]
        wake: String,
        /// Nap interval (HH:MM-HH:MM); repeat per nap, in order
        #[arg(long = "nap")]
        naps: Vec<String>,
        /// Night sleep start (HH:MM)
        #[arg(long)]
        night: String,
    },
    /// Show today's schedule
    Show {
        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recent sleep history
    History {
        /// Number of days to show
        #[arg(long, default_value = "7")]
        days: usize,
    },
    /// Show the trained model parameters
    Model {
        /// Print the model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Push today's schedule to the calendar
    Sync,
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Train => commands::train::run(),
        Commands::Predict { wake_time } => commands::predict::run(&wake_time),
        Commands::Correct { target, start, end } => {
            commands::correct::run(&target, &start, end.as_deref())
        }
        Commands::Add { date, wake, naps, night } => {
            commands::add::run(&date, &wake, &naps, &night)
        }
        Commands::Show { json } => commands::show::run(json),
        Commands::History { days } => commands::history::run(days),
        Commands::Model { json } => commands::model::run(json),
        Commands::Sync => commands::sync::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
