use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{App, Arg, ArgMatches, SubCommand};

use tagline::build::build_site;
use tagline::config::Config;
use tagline::filter::FilterController;
use tagline::page::PageModel;
use tagline::post::Parser as PostParser;
use tagline::quote::{HttpQuoteService, QuoteService};

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut app = App::new("tagline")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tag-filtering blog engine")
        .subcommand(
            SubCommand::with_name("build")
                .about("Build the RSS feed and copy static assets")
                .arg(project_arg())
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .help("The output directory (default: `_build`)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("preview")
                .about("Drive the blog page's tag filter from the terminal")
                .arg(project_arg()),
        );
    let matches = app.clone().get_matches();

    match matches.subcommand() {
        ("build", Some(matches)) => build(matches),
        ("preview", Some(matches)) => preview(matches),
        _ => {
            app.print_long_help()?;
            println!();
            Ok(())
        }
    }
}

fn project_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("project")
        .short("p")
        .long("project")
        .takes_value(true)
        .help("The project directory (default: the working directory)")
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    let project = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let output = matches.value_of("output").unwrap_or("_build");
    Config::from_directory(&project, Path::new(output))
}

fn build(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    build_site(&config)?;
    Ok(())
}

fn preview(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let posts =
        PostParser::new(&config.blog_url).parse_posts(&config.posts_source_directory)?;
    let page = PageModel::from_posts(
        &posts,
        &config.tags,
        chrono::Utc::today().naive_utc(),
    );

    let quotes = config.quote_url.clone().map(HttpQuoteService::new);
    let controller = FilterController::initialize(
        page,
        config.blog_url.clone(),
        quotes.as_ref().map(|service| service as &dyn QuoteService),
    );

    println!("commands: tag <id> | back | forward | show | quit");
    render(&controller);
    run_repl(controller)
}

fn run_repl(mut controller: FilterController) -> Result<()> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("tag") => match words.next() {
                Some(id) => controller.handle_tag_click(id),
                None => {
                    println!("usage: tag <id>");
                    continue;
                }
            },
            Some("back") => {
                if !controller.back() {
                    println!("already at the oldest entry");
                    continue;
                }
            }
            Some("forward") => {
                if !controller.forward() {
                    println!("already at the newest entry");
                    continue;
                }
            }
            Some("show") | None => {}
            Some("quit") | Some("exit") => break,
            Some(other) => {
                println!("unknown command: {}", other);
                continue;
            }
        }
        render(&controller);
    }
    Ok(())
}

fn render(controller: &FilterController) {
    let page = controller.page();

    println!();
    println!("url: {}", controller.current_url());
    if let Some(text) = page.quote.as_ref().and_then(|slot| slot.text.as_ref()) {
        println!("quote: {}", text);
    }

    let controls: Vec<String> = page
        .controls
        .iter()
        .map(|control| {
            if control.selected {
                format!("[{}]", control.label)
            } else {
                format!(" {} ", control.label)
            }
        })
        .collect();
    println!("tags: {}", controls.join(" "));

    for section in page
        .star_section
        .iter()
        .chain(page.timeline_section.iter())
    {
        if !section.title_visible {
            continue;
        }
        println!("# {}", section.title);
        for &index in &section.items {
            let item = &page.items[index];
            if item.visible {
                println!("  - {}", item.title);
            }
        }
    }
    println!();
}
