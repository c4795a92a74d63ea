use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{App, Arg, ArgMatches};
use convert_case::{Case, Casing};
use image::GenericImageView;
use log::{error, info, warn};

use staffelei::compositor::{self, Style};
use staffelei::config::{self, Settings};
use staffelei::display::{self, Display};
use staffelei::errors::{StaffeleiError, StaffeleiResult};
use staffelei::font::FontRenderer;
use staffelei::provider;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

fn check_interrupted() -> StaffeleiResult<()> {
    if INTERRUPTED.load(Ordering::Relaxed) {
        Err(StaffeleiError::Interrupted)
    } else {
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("Staffelei")
        .about("Shows a random image with an optional text overlay on a display")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .about("Path to the configuration file")
                .takes_value(true)
                .default_value("staffelei.toml"),
        )
        .arg(
            Arg::new("display")
                .short('d')
                .long("display")
                .about("Override the configured display driver")
                .takes_value(true)
                .possible_values(&["framebuffer", "mock"]),
        )
        .get_matches();

    let config_path = matches.value_of("config").expect("Config path missing");
    let settings = match config::load_settings(config_path) {
        Ok(settings) => {
            info!("Loaded configuration from {}", config_path);
            settings
        }
        Err(e) => {
            warn!("Failed to read configuration ({}), using defaults", e);
            Settings::default()
        }
    };

    if let Err(e) = run(&matches, &settings) {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(matches: &ArgMatches, settings: &Settings) -> StaffeleiResult<()> {
    ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::Relaxed))
        .expect("Failed to install interrupt handler");

    info!(
        "Supported displays: {:?}",
        display::list_supported_displays()
    );
    let driver_name = matches
        .value_of("display")
        .unwrap_or_else(|| settings.display.display_type.as_str());
    let mut driver = display::load_display_driver(driver_name, &settings.display)?;

    // the display handle must be released on every exit path past this point
    let result = render_pass(driver.as_mut(), settings);
    if let Err(e) = driver.close() {
        warn!("Failed to close display: {}", e);
    }
    result
}

fn render_pass(display: &mut dyn Display, settings: &Settings) -> StaffeleiResult<()> {
    let image_directory = Path::new(&settings.file.image_location);
    if !image_directory.exists() {
        return Err(StaffeleiError::ResourceMissing(
            image_directory.to_path_buf(),
        ));
    }
    let font_path = Path::new(&settings.file.font_file);
    if !font_path.exists() {
        return Err(StaffeleiError::ResourceMissing(font_path.to_path_buf()));
    }

    let image_path = provider::pick_random_file(image_directory, &settings.file.image_format)?;
    let image = provider::load_image_from_path(&image_path)?;
    check_interrupted()?;

    let (width, height) = display.dimensions();
    info!("Display resolution: {}x{}", width, height);
    let thumb = compositor::thumbnail(image, width, height);
    let crop = compositor::crop_box((width, height), (thumb.width(), thumb.height()));
    let mut frame = compositor::apply_crop(&thumb.to_rgba8(), &crop);

    let image_name = image_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let mut title = image_name.clone();
    let mut artist = String::new();
    if settings.text.parse_text {
        let (parsed_title, parsed_artist) = provider::parse_title_artist(
            &image_name,
            &settings.text.preamble_regex,
            &settings.text.artist_regex,
            &settings.file.image_format,
        )?;
        let remove = settings.text.remove_text_list();
        title = provider::strip_substrings(&parsed_title, &remove).to_case(Case::Title);
        artist = provider::strip_substrings(&parsed_artist, &remove).to_case(Case::Title);
        info!("Title: {:?}, artist: {:?}", title, artist);
    }

    if settings.text.add_text {
        let font = FontRenderer::from_path(font_path)?;
        let style = Style {
            title_loc: settings.text.title_loc,
            title_size: settings.text.title_size,
            artist_loc: settings.text.artist_loc,
            artist_size: settings.text.artist_size,
            padding: settings.text.padding,
            opacity: settings.text.opacity,
            box_to_floor: settings.text.box_to_floor,
            box_to_edge: settings.text.box_to_edge,
        };
        compositor::draw_overlay(&mut frame, &crop, &title, &artist, &font, &style)?;
    }
    check_interrupted()?;

    display.prepare()?;
    display.display(&frame)?;

    if settings.debug.image_viewer {
        frame.save("staffelei-preview.png")?;
        info!("Saved preview frame to staffelei-preview.png");
    }
    Ok(())
}
