use clap::{value_parser, Arg, ArgMatches, Command};
use tracing_subscriber::EnvFilter;
use vsong::configuration::{create_config, ConfigFolder};
use vsong::foundation::models::{ChartKind, GenderFilter};
use vsong::startup::{run, Action};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Command::new("vsong")
        .about("🎤 Browse VTuber songs, charts and channels from your terminal 🎤")
        .subcommand(Command::new("config").about("🛠️ Create or update configuration file for vsong"))
        .subcommand(
            Command::new("main")
                .about("🏠 Show the latest and random songs and shorts")
                .arg(
                    Arg::new("gender")
                        .long("gender")
                        .help("all, male or female")
                        .value_parser(value_parser!(GenderFilter))
                        .default_value("all"),
                ),
        )
        .subcommand(
            Command::new("chart")
                .about("📈 Show the weekly, daily or shorts chart")
                .arg(
                    Arg::new("kind")
                        .help("weekly, daily or shorts")
                        .value_parser(value_parser!(ChartKind))
                        .default_value("weekly"),
                )
                .arg(play_arg()),
        )
        .subcommand(
            Command::new("search")
                .about("🔍 Search songs and VTuber channels")
                .arg(
                    Arg::new("query")
                        .required_unless_present("channel-id")
                        .num_args(1..),
                )
                .arg(Arg::new("channel-id").long("channel-id")),
        )
        .subcommand(
            Command::new("vtuber")
                .about("🎙️ Show a VTuber channel and its registered songs")
                .arg(Arg::new("channel-id").required(true))
                .arg(play_arg()),
        )
        .subcommand(
            Command::new("open")
                .about("🔗 Open a site path such as /vtuber/UC... or /search?query=...")
                .arg(Arg::new("path").required(true)),
        )
        .subcommand(Command::new("whoami").about("👤 Show who is logged in"))
        .subcommand(Command::new("login").about("🔑 Print the Google login address"))
        .subcommand(Command::new("logout").about("🚪 Log out of the backend"))
        .get_matches();

    let cfg_folder = ConfigFolder::new()?;

    let action = match args.subcommand() {
        Some(("config", _)) => {
            println!("\x1b[1m\x1b[34mConfiguring vsong...\x1b[0m");
            return create_config(&cfg_folder);
        }
        Some(("main", sub)) => Action::Main {
            gender: sub
                .get_one::<GenderFilter>("gender")
                .copied()
                .unwrap_or_default(),
        },
        Some(("chart", sub)) => Action::Chart {
            kind: sub.get_one::<ChartKind>("kind").copied().unwrap_or_default(),
            play: play_value(sub),
        },
        Some(("search", sub)) => Action::Search {
            term: sub
                .get_many::<String>("query")
                .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
                .unwrap_or_default(),
            channel_id: sub.get_one::<String>("channel-id").cloned(),
        },
        Some(("vtuber", sub)) => Action::Vtuber {
            channel_id: sub
                .get_one::<String>("channel-id")
                .cloned()
                .unwrap_or_default(),
            play: play_value(sub),
        },
        Some(("open", sub)) => Action::Open {
            path: sub.get_one::<String>("path").cloned().unwrap_or_default(),
        },
        Some(("whoami", _)) => Action::WhoAmI,
        Some(("login", _)) => Action::Login,
        Some(("logout", _)) => Action::Logout,
        _ => {
            print_usage();
            return Ok(());
        }
    };

    run(&cfg_folder, action).await
}

fn play_arg() -> Arg {
    Arg::new("play")
        .long("play")
        .help("Print the player address of the entry at this position")
        .value_parser(value_parser!(usize))
}

fn play_value(sub: &ArgMatches) -> Option<usize> {
    sub.get_one::<usize>("play").copied()
}

fn print_usage() {
    println!("\x1b[1m\x1b[31mInvalid command!\x1b[0m\n");
    println!("📖 Available Commands:");
    println!("  \x1b[1m\x1b[32mvsong main [--gender]\x1b[0m        - 🏠 Latest and random songs");
    println!("  \x1b[1m\x1b[32mvsong chart [kind]\x1b[0m           - 📈 Weekly, daily or shorts chart");
    println!("  \x1b[1m\x1b[32mvsong search [query]\x1b[0m         - 🔍 Search songs and channels");
    println!("  \x1b[1m\x1b[32mvsong vtuber <channel-id>\x1b[0m    - 🎙️  Channel details and songs");
    println!("  \x1b[1m\x1b[32mvsong open <path>\x1b[0m            - 🔗 Open a site path");
    println!("  \x1b[1m\x1b[32mvsong whoami | login | logout\x1b[0m - 👤 Session commands");
    println!("  \x1b[1m\x1b[32mvsong config\x1b[0m                 - 🛠️  Create or update configuration file");
    println!("\x1b[33mRun 'vsong config' first to point vsong at your backend.\x1b[0m\n");
}
