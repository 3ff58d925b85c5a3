use mapgrid::api::{CsvFormatter, JsonFormatter, TextFormatter};
use mapgrid::platform::{
    AuthorizationState, MockGeocoder, MockLocationService, RecordingRenderer,
};
use mapgrid::{
    encode, CameraPose, ConfigurationManager, Coordinate, MapScreen, Placemark, PositionFix,
    ScreenConfig, ScreenEvent,
};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type DemoScreen = MapScreen<MockLocationService, RecordingRenderer, MockGeocoder>;

const FRAME_COUNT: u32 = 4;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Print grid codes for a handful of places at every supported length
fn grid_code_demo() -> Result<(), Box<dyn std::error::Error>> {
    let places = [
        ("Mountain View", Coordinate::new(37.4219983, -122.084)),
        ("London", Coordinate::new(51.5074, -0.1278)),
        ("Sydney", Coordinate::new(-33.8688, 151.2093)),
        ("Reykjavik", Coordinate::new(64.1466, -21.9426)),
    ];

    println!("=== Grid codes ===");
    for (name, coordinate) in places {
        let codes = [2, 4, 6, 8, 10]
            .iter()
            .map(|&length| encode(coordinate, length).map(|code| code.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        println!("{:<14} {}", name, codes.join("  "));
    }
    println!();
    Ok(())
}

/// Log intermediate poses the way a host stepping its own animation would
fn log_frames(screen: &DemoScreen, from: &CameraPose) -> Option<CameraPose> {
    let (to, animation) = screen.renderer().last_camera()?;
    for frame in 1..=FRAME_COUNT {
        let t = frame as f64 / FRAME_COUNT as f64;
        let pose = from.interpolate(&to, t, animation.easing);
        debug!(
            animation = animation.id.id(),
            t,
            lat = pose.center.latitude,
            lon = pose.center.longitude,
            heading = pose.heading,
            "camera frame"
        );
    }
    Some(to)
}

/// Drive every pending camera animation to completion
fn finish_camera(screen: &mut DemoScreen, mut pose: CameraPose) -> CameraPose {
    while let Some(id) = screen.pending_animation() {
        let issued = screen.renderer().camera_calls().len();
        screen.on_camera_animation_finished(id);
        if screen.renderer().camera_calls().len() > issued {
            if let Some(next) = log_frames(screen, &pose) {
                pose = next;
            }
        }
    }
    pose
}

/// Scripted session: permission prompt, grant, fix, geocode
fn session_demo(config: ScreenConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = MapScreen::new(
        MockLocationService::new(AuthorizationState::NotDetermined),
        RecordingRenderer::new(),
        MockGeocoder::new(),
        config,
    )?;

    screen.register_event_callback(Box::new(|event: ScreenEvent| info!(?event, "screen event")));

    println!("=== Session ===");
    screen.initialize();
    println!(
        "permission requests: {}, fix requests: {}",
        screen.location().permission_requests(),
        screen.location().fix_requests()
    );

    // User taps "Allow While Using App"
    screen
        .location_mut()
        .set_status(AuthorizationState::AuthorizedWhenInUse);
    screen.on_authorization_changed(AuthorizationState::AuthorizedWhenInUse);
    println!(
        "permission requests: {}, fix requests: {}",
        screen.location().permission_requests(),
        screen.location().fix_requests()
    );

    let world_view = CameraPose {
        center: Coordinate::new(0.0, 0.0),
        distance: 20_000_000.0,
        pitch: 0.0,
        heading: 0.0,
    };

    let fix = PositionFix::new(Coordinate::new(37.4219983, -122.084), now_ms());
    screen.on_fixes_received(&[fix]);
    let pose = log_frames(&screen, &world_view).unwrap_or(world_view);
    let pose = finish_camera(&mut screen, pose);

    let text = TextFormatter::new();
    print!("{}", text.format_text(&screen.snapshot()));

    if let Some(request) = screen.geocoder_mut().take_next() {
        let placemark = Placemark {
            name: Some("Googleplex".to_string()),
            locality: Some("Mountain View".to_string()),
            country: Some("United States".to_string()),
            ..MockGeocoder::placemark_for(&request, "Googleplex", 0.00002)
        };
        screen.on_geocode_resolved(request, Ok(placemark));
        let pose = log_frames(&screen, &pose).unwrap_or(pose);
        finish_camera(&mut screen, pose);
    }

    println!();
    print!("{}", text.format_text(&screen.snapshot()));

    let csv = CsvFormatter::new();
    println!();
    println!("{}", csv.header());
    println!("{}", csv.format_csv(&screen.snapshot()));

    println!();
    println!("{}", JsonFormatter::pretty().format_json(&screen.snapshot())?);
    println!("camera commands issued: {}", screen.renderer().camera_calls().len());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading screen config");
            ConfigurationManager::from_file(&path)?.config().clone()
        }
        None => ScreenConfig::default(),
    };

    grid_code_demo()?;
    session_demo(config)?;
    Ok(())
}
