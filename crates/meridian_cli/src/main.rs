use std::fmt::Display;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use meridian_core::{
    AtmosphereModel, BuiltinLeapSeconds, CatalogStar, DEFAULT_ZENITH_CLAMP_DEG, EarthOrientation,
    Engine, EngineConfig, LeapSecondKernel, LeapSecondProvider, MAX_REFRACTION_ITERATIONS,
    ObservationRequest, ObservationTime, ObservedCoordinates, ObserverSite, PipelineTrace,
    RefractionConstants, RefractionModel, StandardRefraction,
};
use meridian_frames::Ellipsoid;
use meridian_time::{EopKernel, JulianPair, SECONDS_PER_DAY, UtcTime};
use serde_json::json;

const ARCSEC_PER_RAD: f64 = 180.0 * 3600.0 / std::f64::consts::PI;

#[derive(Parser)]
#[command(name = "meridian", about = "Observed places of catalog stars")]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Observe the built-in reference star (2003-08-26, 52.4° N)
    Demo {
        /// Path to leap second kernel (naif0012.tls)
        #[arg(long)]
        lsk: Option<PathBuf>,
    },
    /// Observed place of one star
    Observe(ObserveArgs),
    /// Refraction constants A and B for given weather
    Refraction {
        /// Pressure in hPa (default: standard atmosphere at --height)
        #[arg(long)]
        pressure: Option<f64>,
        /// Height for the standard-atmosphere pressure, metres
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        height: f64,
        /// Ambient temperature, °C
        #[arg(long, default_value = "15", allow_hyphen_values = true)]
        temperature: f64,
        /// Relative humidity, 0..1
        #[arg(long, default_value = "0")]
        humidity: f64,
        /// Wavelength in micrometres
        #[arg(long, default_value = "0.55")]
        wavelength: f64,
        /// Also refract this geometric zenith distance, degrees
        #[arg(long)]
        zd: Option<f64>,
    },
    /// TAI−UTC at a UTC instant
    Leap {
        /// UTC datetime (YYYY-MM-DDThh:mm:ssZ)
        #[arg(long)]
        date: String,
        /// Path to leap second kernel (default: built-in table)
        #[arg(long)]
        lsk: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
struct ObserveArgs {
    /// JSON ObservationRequest; flags below override its fields
    #[arg(long)]
    input: Option<PathBuf>,

    /// Catalog right ascension, radians
    #[arg(long, allow_hyphen_values = true)]
    ra: Option<f64>,
    /// Catalog declination, radians
    #[arg(long, allow_hyphen_values = true)]
    dec: Option<f64>,
    /// Proper motion dRA/dt, radians per Julian year
    #[arg(long, allow_hyphen_values = true)]
    pm_ra: Option<f64>,
    /// Proper motion dDec/dt, radians per Julian year
    #[arg(long, allow_hyphen_values = true)]
    pm_dec: Option<f64>,
    /// Parallax, arcseconds
    #[arg(long)]
    parallax: Option<f64>,
    /// Radial velocity, km/s (receding positive)
    #[arg(long, allow_hyphen_values = true)]
    rv: Option<f64>,
    /// Catalog epoch, Julian years TT
    #[arg(long)]
    epoch: Option<f64>,

    /// UTC datetime (YYYY-MM-DDThh:mm:ssZ), instead of --utc1/--utc2
    #[arg(long, conflicts_with_all = ["utc1", "utc2"])]
    date: Option<String>,
    /// UTC two-part Julian Date, first part
    #[arg(long, allow_hyphen_values = true)]
    utc1: Option<f64>,
    /// UTC two-part Julian Date, second part
    #[arg(long, allow_hyphen_values = true)]
    utc2: Option<f64>,
    /// UT1−UTC, seconds
    #[arg(long, allow_hyphen_values = true)]
    dut1: Option<f64>,

    /// Site longitude, radians east
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Site geodetic latitude, radians
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Height above the ellipsoid, metres
    #[arg(long, allow_hyphen_values = true)]
    height: Option<f64>,
    /// Reference ellipsoid for the site
    #[arg(long, value_enum)]
    ellipsoid: Option<EllipsoidArg>,

    /// Polar motion x, radians
    #[arg(long, allow_hyphen_values = true)]
    xp: Option<f64>,
    /// Polar motion y, radians
    #[arg(long, allow_hyphen_values = true)]
    yp: Option<f64>,

    /// Pressure in hPa (0 disables refraction)
    #[arg(long)]
    pressure: Option<f64>,
    /// Ambient temperature, °C
    #[arg(long, allow_hyphen_values = true)]
    temperature: Option<f64>,
    /// Relative humidity, 0..1
    #[arg(long)]
    humidity: Option<f64>,
    /// Wavelength in micrometres
    #[arg(long)]
    wavelength: Option<f64>,
    /// Estimate pressure from the site height when --pressure is absent
    #[arg(long)]
    standard_atmosphere: bool,

    /// Path to leap second kernel (naif0012.tls)
    #[arg(long)]
    lsk: Option<PathBuf>,
    /// IERS finals2000A file; fills dut1, xp and yp not given as flags
    #[arg(long)]
    eop: Option<PathBuf>,
    /// Fixed-point refraction iterations
    #[arg(long)]
    iterations: Option<u8>,
    /// Print every pipeline stage
    #[arg(long)]
    trace: bool,
    /// Machine-readable output
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EllipsoidArg {
    Wgs84,
    Grs80,
    Wgs72,
    Iers2010,
}

impl From<EllipsoidArg> for Ellipsoid {
    fn from(arg: EllipsoidArg) -> Self {
        match arg {
            EllipsoidArg::Wgs84 => Ellipsoid::Wgs84,
            EllipsoidArg::Grs80 => Ellipsoid::Grs80,
            EllipsoidArg::Wgs72 => Ellipsoid::Wgs72,
            EllipsoidArg::Iers2010 => Ellipsoid::Iers2010,
        }
    }
}

fn fail(msg: impl Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

/// The reference scenario: a 52° N site shortly after midnight UTC.
fn demo_request() -> ObservationRequest {
    ObservationRequest {
        star: CatalogStar::new(
            6.165_024_380_012_967,
            0.912_411_052_162_464_2,
            1.814_563_520_731_807_7e-7,
            -1.018_108_730_330_025_7e-8,
            0.023,
            25.0,
        ),
        time: ObservationTime::new(2_452_878.0, -0.473_854_469_791_666_7, -0.349_518_611_406_224_1),
        site: ObserverSite::new(0.169_509_099_667_322_4, 0.914_301_881_311_149_8, 200.0),
        orientation: EarthOrientation::new(1.257_313_209_164_841_7e-6, 2.015_800_882_740_645_5e-6),
        atmosphere: AtmosphereModel::new(1013.25, 15.0, 0.5, 0.55),
    }
}

fn load_engine(lsk: Option<PathBuf>, iterations: Option<u8>) -> Engine {
    let mut config = EngineConfig {
        lsk_path: lsk,
        ..EngineConfig::default()
    };
    if let Some(n) = iterations {
        config.refraction_iterations = n;
    }
    Engine::new(config).unwrap_or_else(|e| fail(format!("Failed to create engine: {e}")))
}

fn read_request(path: &Path) -> Result<ObservationRequest, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid request in {}: {e}", path.display()))
}

/// Request from the optional input file with command-line overrides.
fn build_request(args: &ObserveArgs) -> Result<ObservationRequest, String> {
    let base = match &args.input {
        Some(path) => Some(read_request(path)?),
        None => None,
    };

    let star = match (base.map(|r| r.star), args.ra, args.dec) {
        (Some(s), ra, dec) => CatalogStar {
            ra: ra.unwrap_or(s.ra),
            dec: dec.unwrap_or(s.dec),
            ..s
        },
        (None, Some(ra), Some(dec)) => CatalogStar::fixed(ra, dec),
        (None, _, _) => return Err("--ra and --dec are required without --input".into()),
    };
    let star = CatalogStar {
        pm_ra: args.pm_ra.unwrap_or(star.pm_ra),
        pm_dec: args.pm_dec.unwrap_or(star.pm_dec),
        parallax_arcsec: args.parallax.unwrap_or(star.parallax_arcsec),
        radial_velocity_km_s: args.rv.unwrap_or(star.radial_velocity_km_s),
        epoch: args.epoch.unwrap_or(star.epoch),
        ..star
    };

    let dut1 = args.dut1.or(base.map(|r| r.time.dut1)).unwrap_or(0.0);
    let time = match (&args.date, args.utc1, base) {
        (Some(date), _, _) => {
            let utc: UtcTime = date.parse().map_err(|e| format!("invalid --date: {e}"))?;
            ObservationTime::from_utc(&utc, dut1).map_err(|e| e.to_string())?
        }
        (None, Some(utc1), _) => ObservationTime::new(utc1, args.utc2.unwrap_or(0.0), dut1),
        (None, None, Some(r)) => ObservationTime {
            utc2: args.utc2.unwrap_or(r.time.utc2),
            dut1,
            ..r.time
        },
        (None, None, None) => return Err("one of --date, --utc1 or --input is required".into()),
    };

    let site = match (base.map(|r| r.site), args.lon, args.lat) {
        (Some(s), lon, lat) => ObserverSite {
            longitude: lon.unwrap_or(s.longitude),
            latitude: lat.unwrap_or(s.latitude),
            ..s
        },
        (None, Some(lon), Some(lat)) => ObserverSite::new(lon, lat, 0.0),
        (None, _, _) => return Err("--lon and --lat are required without --input".into()),
    };
    let site = ObserverSite {
        height_m: args.height.unwrap_or(site.height_m),
        ellipsoid: args.ellipsoid.map(Ellipsoid::from).or(site.ellipsoid),
        ..site
    };

    let orientation = base.map(|r| r.orientation).unwrap_or_default();
    let orientation = EarthOrientation::new(
        args.xp.unwrap_or(orientation.xp),
        args.yp.unwrap_or(orientation.yp),
    );

    let atmosphere = base.map(|r| r.atmosphere).unwrap_or_default();
    let temperature_c = args.temperature.unwrap_or(atmosphere.temperature_c);
    let pressure_hpa = match args.pressure {
        Some(p) => p,
        None if args.standard_atmosphere => {
            AtmosphereModel::standard_for_height(site.height_m, temperature_c).pressure_hpa
        }
        None => atmosphere.pressure_hpa,
    };
    let atmosphere = AtmosphereModel::new(
        pressure_hpa,
        temperature_c,
        args.humidity.unwrap_or(atmosphere.relative_humidity),
        args.wavelength.unwrap_or(atmosphere.wavelength_um),
    );

    Ok(ObservationRequest {
        star,
        time,
        site,
        orientation,
        atmosphere,
    })
}

/// Fill Earth orientation from an EOP table where no flag was given.
fn apply_eop(
    request: &mut ObservationRequest,
    args: &ObserveArgs,
    eop: &EopKernel,
) -> Result<(), String> {
    let sample = eop
        .sample_at_utc(request.time.utc())
        .map_err(|e| format!("EOP lookup failed: {e}"))?;
    log::info!(
        "EOP at MJD {:.5}: dut1 = {:.7} s, xp = {:.3e}, yp = {:.3e} rad",
        request.time.utc().mjd(),
        sample.dut1_s,
        sample.xp_rad,
        sample.yp_rad
    );
    if args.dut1.is_none() {
        request.time.dut1 = sample.dut1_s;
    }
    if args.xp.is_none() {
        request.orientation.xp = sample.xp_rad;
    }
    if args.yp.is_none() {
        request.orientation.yp = sample.yp_rad;
    }
    Ok(())
}

fn print_coordinates(obs: &ObservedCoordinates) {
    let [az, alt, ha, dec, ra, eo] = obs.to_degrees();
    println!("  Azimuth:          {az:>16.9} deg");
    println!("  Altitude:         {alt:>16.9} deg");
    println!("  Zenith distance:  {:>16.9} deg", obs.zenith_distance.to_degrees());
    println!("  Hour angle:       {ha:>16.9} deg");
    println!("  Declination:      {dec:>16.9} deg");
    println!("  Right ascension:  {ra:>16.9} deg");
    println!("  Eq. of origins:   {:>16.6} arcsec", eo * 3600.0);
}

fn jd_json(jd: JulianPair) -> serde_json::Value {
    json!([jd.jd1, jd.jd2])
}

fn trace_json(trace: &PipelineTrace) -> serde_json::Value {
    let s = &trace.scales;
    json!({
        "time": {
            "utc": jd_json(s.utc),
            "tai": jd_json(s.tai),
            "tt": jd_json(s.tt),
            "ut1": jd_json(s.ut1),
            "tai_minus_utc": s.tai_minus_utc,
            "tt_minus_ut1": s.tt_minus_ut1,
        },
        "elapsed_years": trace.elapsed_years,
        "bcrs_direction": trace.bcrs,
        "intermediate": {
            "ra": trace.intermediate.ra,
            "dec": trace.intermediate.dec,
            "equation_of_origins": trace.intermediate.equation_of_origins,
        },
        "topocentric": {
            "azimuth": trace.topocentric.azimuth,
            "zenith_distance": trace.topocentric.zenith_distance,
            "hour_angle": trace.topocentric.hour_angle,
            "declination": trace.topocentric.declination,
        },
        "refraction": trace.refraction,
        "observed_zenith_distance": trace.observed_zenith_distance,
        "observed": trace.coordinates,
    })
}

fn print_trace(trace: &PipelineTrace) {
    let s = &trace.scales;
    println!("Time scales:");
    println!("  TAI-UTC:          {:>16.3} s", s.tai_minus_utc);
    println!("  TT-UT1:           {:>16.6} s", s.tt_minus_ut1);
    println!("  TT:               {:.1} + {:.12}", s.tt.jd1, s.tt.jd2);
    println!("  UT1:              {:.1} + {:.12}", s.ut1.jd1, s.ut1.jd2);
    println!("Space motion:");
    println!("  Elapsed:          {:>16.9} yr", trace.elapsed_years);
    println!(
        "  BCRS direction:   [{:.12}, {:.12}, {:.12}]",
        trace.bcrs[0], trace.bcrs[1], trace.bcrs[2]
    );
    println!("Intermediate (CIRS):");
    println!("  RA:               {:>16.9} deg", trace.intermediate.ra.to_degrees());
    println!("  Dec:              {:>16.9} deg", trace.intermediate.dec.to_degrees());
    println!("Topocentric (geometric):");
    println!("  Azimuth:          {:>16.9} deg", trace.topocentric.azimuth.to_degrees());
    println!(
        "  Zenith distance:  {:>16.9} deg",
        trace.topocentric.zenith_distance.to_degrees()
    );
    println!("Refraction:");
    println!("  A:                {:>16.6} arcsec", trace.refraction.a * ARCSEC_PER_RAD);
    println!("  B:                {:>16.6} arcsec", trace.refraction.b * ARCSEC_PER_RAD);
    println!(
        "  Correction:       {:>16.6} arcsec",
        (trace.topocentric.zenith_distance - trace.observed_zenith_distance) * ARCSEC_PER_RAD
    );
    println!("Observed:");
    print_coordinates(&trace.coordinates);
}

fn run_observe(args: &ObserveArgs) {
    let mut request = build_request(args).unwrap_or_else(|e| fail(e));
    if let Some(path) = &args.eop {
        let eop = EopKernel::load(path).unwrap_or_else(|e| fail(format!("Failed to load EOP: {e}")));
        apply_eop(&mut request, args, &eop).unwrap_or_else(|e| fail(e));
    }
    let engine = load_engine(args.lsk.clone(), args.iterations);
    log::debug!("request: {request:?}");

    if args.trace {
        let trace = engine
            .observe_with_trace(&request)
            .unwrap_or_else(|e| fail(format!("Error: {e}")));
        if args.json {
            println!("{:#}", trace_json(&trace));
        } else {
            print_trace(&trace);
        }
        return;
    }

    let obs = engine
        .observe(&request)
        .unwrap_or_else(|e| fail(format!("Error: {e}")));
    if args.json {
        let out = serde_json::to_string_pretty(&obs)
            .unwrap_or_else(|e| fail(format!("Cannot encode output: {e}")));
        println!("{out}");
    } else {
        println!("Observed place:");
        print_coordinates(&obs);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Demo { lsk } => {
            let engine = load_engine(lsk, None);
            let obs = engine
                .observe(&demo_request())
                .unwrap_or_else(|e| fail(format!("Error: {e}")));
            let values = obs.to_degrees().map(|v| format!("{v:.18}"));
            println!("{}", values.join(" "));
        }

        Commands::Observe(args) => run_observe(&args),

        Commands::Refraction {
            pressure,
            height,
            temperature,
            humidity,
            wavelength,
            zd,
        } => {
            let pressure =
                pressure.unwrap_or(AtmosphereModel::standard_for_height(height, temperature).pressure_hpa);
            let atmosphere = AtmosphereModel::new(pressure, temperature, humidity, wavelength);
            if let Err(e) = atmosphere.validate() {
                fail(e);
            }
            let c = RefractionConstants::from_atmosphere(&atmosphere);
            println!("Pressure: {pressure:.2} hPa");
            println!("A = {:.15e} rad ({:.6} arcsec)", c.a, c.a * ARCSEC_PER_RAD);
            println!("B = {:.15e} rad ({:.6} arcsec)", c.b, c.b * ARCSEC_PER_RAD);
            if let Some(zd_deg) = zd {
                let model = StandardRefraction::new(
                    MAX_REFRACTION_ITERATIONS,
                    DEFAULT_ZENITH_CLAMP_DEG.to_radians(),
                );
                let geometric = zd_deg.to_radians();
                let observed = model.observed_zenith_distance(geometric, &c);
                println!(
                    "zd {zd_deg:.6} deg -> {:.6} deg (refraction {:.3} arcsec)",
                    observed.to_degrees(),
                    (geometric - observed) * ARCSEC_PER_RAD
                );
            }
        }

        Commands::Leap { date, lsk } => {
            let utc: UtcTime = date
                .parse()
                .unwrap_or_else(|e| fail(format!("invalid --date: {e}")));
            let provider: Box<dyn LeapSecondProvider> = match lsk {
                Some(path) => Box::new(
                    LeapSecondKernel::load(&path)
                        .unwrap_or_else(|e| fail(format!("Failed to load LSK: {e}"))),
                ),
                None => Box::new(BuiltinLeapSeconds),
            };
            let fraction = (3600.0 * utc.hour as f64 + 60.0 * utc.minute as f64 + utc.second)
                / SECONDS_PER_DAY;
            let offset = provider
                .tai_minus_utc(utc.year, utc.month, utc.day, fraction)
                .unwrap_or_else(|e| fail(format!("Error: {e}")));
            println!("TAI-UTC at {utc}: {offset:.7} s");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn observe_args(argv: &[&str]) -> ObserveArgs {
        let mut full = vec!["meridian", "observe"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Observe(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_build_a_request() {
        let args = observe_args(&[
            "--ra", "2.71", "--dec", "0.174", "--parallax", "0.1", "--rv", "55",
            "--utc1", "2456384.5", "--utc2", "0.969254051", "--dut1", "0.1550675",
            "--lon", "-0.527800806", "--lat", "-1.2345856", "--height", "2738",
            "--pressure", "731", "--temperature", "12.8", "--humidity", "0.59",
            "--ellipsoid", "grs80",
        ]);
        let r = build_request(&args).unwrap();
        assert_eq!(r.star.ra, 2.71);
        assert_eq!(r.star.parallax_arcsec, 0.1);
        assert_eq!(r.time, ObservationTime::new(2_456_384.5, 0.969_254_051, 0.155_067_5));
        assert_eq!(r.site.longitude, -0.527_800_806);
        assert_eq!(r.site.ellipsoid, Some(Ellipsoid::Grs80));
        assert_eq!(r.atmosphere.pressure_hpa, 731.0);
        assert_eq!(r.atmosphere.wavelength_um, 0.55);
        assert_eq!(r.orientation, EarthOrientation::default());
    }

    #[test]
    fn date_flag_splits_day_and_fraction() {
        let args = observe_args(&[
            "--ra", "1", "--dec", "0.5", "--date", "2003-08-26T12:00:00Z", "--lon", "0",
            "--lat", "0.9",
        ]);
        let r = build_request(&args).unwrap();
        assert_eq!(r.time.utc().total(), 2_452_878.0);
        assert_eq!(r.time.dut1, 0.0);
    }

    #[test]
    fn missing_star_is_reported() {
        let args = observe_args(&["--utc1", "2456384.5", "--lon", "0", "--lat", "0"]);
        assert!(build_request(&args).unwrap_err().contains("--ra"));
    }

    #[test]
    fn standard_atmosphere_uses_site_height() {
        let args = observe_args(&[
            "--ra", "1", "--dec", "0.5", "--utc1", "2456384.5", "--lon", "0", "--lat", "0.3",
            "--height", "2000", "--standard-atmosphere",
        ]);
        let r = build_request(&args).unwrap();
        let expected = AtmosphereModel::standard_for_height(2000.0, 15.0).pressure_hpa;
        assert_eq!(r.atmosphere.pressure_hpa, expected);
    }

    #[test]
    fn input_file_with_overrides() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/southern_site.json");
        let args = observe_args(&["--input", path, "--pressure", "0", "--dec", "0.2"]);
        let r = build_request(&args).unwrap();
        assert_eq!(r.star.ra, 2.71);
        assert_eq!(r.star.dec, 0.2);
        assert_eq!(r.star.epoch, 2000.0);
        assert_eq!(r.time.utc1, 2_456_384.5);
        assert_eq!(r.site.ellipsoid, Some(Ellipsoid::Wgs84));
        assert_eq!(r.atmosphere.pressure_hpa, 0.0);
        assert_eq!(r.atmosphere.temperature_c, 12.8);
    }

    #[test]
    fn demo_request_is_valid() {
        let obs = Engine::new(EngineConfig::default())
            .unwrap()
            .observe(&demo_request())
            .unwrap();
        assert!(obs.altitude().to_degrees() > 89.0);
    }
}
