use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] bearmaps::osm::Error);

#[derive(Parser)]
#[command(name = "bearmaps")]
#[command(about = "Routing, directions and map tiles over OpenStreetMap data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the shortest route between two points and print it as GeoJSON
    Route(RouteArgs),

    /// Find the shortest route between two points and print turn-by-turn directions
    Directions(RouteArgs),

    /// Print the map tiles which should be displayed for the given viewport
    Raster(RasterArgs),

    /// Print names of all places starting with a prefix
    Search {
        #[command(flatten)]
        graph: GraphArgs,

        /// Case-insensitive prefix of the place name
        prefix: String,
    },

    /// Print positions of all places with the given name
    Locate {
        #[command(flatten)]
        graph: GraphArgs,

        /// Case-insensitive place name
        name: String,
    },
}

#[derive(Args)]
struct GraphArgs {
    /// The path to the OSM file (.osm, .osm.gz or .osm.bz2)
    osm_file: PathBuf,

    /// Remove nodes which are not part of any road
    #[arg(long)]
    prune_isolated: bool,
}

#[derive(Args)]
struct RouteArgs {
    #[command(flatten)]
    graph: GraphArgs,

    /// Longitude of the start point
    #[arg(allow_negative_numbers = true)]
    start_lon: f64,

    /// Latitude of the start point
    #[arg(allow_negative_numbers = true)]
    start_lat: f64,

    /// Longitude of the end point
    #[arg(allow_negative_numbers = true)]
    end_lon: f64,

    /// Latitude of the end point
    #[arg(allow_negative_numbers = true)]
    end_lat: f64,
}

#[derive(Args)]
struct RasterArgs {
    /// Longitude of the upper-left corner
    #[arg(allow_negative_numbers = true)]
    ul_lon: f64,

    /// Latitude of the upper-left corner
    #[arg(allow_negative_numbers = true)]
    ul_lat: f64,

    /// Longitude of the lower-right corner
    #[arg(allow_negative_numbers = true)]
    lr_lon: f64,

    /// Latitude of the lower-right corner
    #[arg(allow_negative_numbers = true)]
    lr_lat: f64,

    /// Viewport width in pixels
    width: f64,

    /// Viewport height in pixels
    height: f64,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Route(args) => {
            let (g, route) = find_route(&args)?;
            print_geojson(&g, &route);
        }

        Command::Directions(args) => {
            let (g, route) = find_route(&args)?;
            if route.len() < 2 {
                log::warn!("start and end points snap to the same node");
                return Ok(());
            }
            for step in bearmaps::route_directions(&g, &route)? {
                println!("{step}");
            }
        }

        Command::Raster(args) => {
            let bbox = bearmaps::BoundingBox::new(args.ul_lon, args.ul_lat, args.lr_lon, args.lr_lat);
            let result = bearmaps::Rasterer::default().raster(&bearmaps::RasterQuery {
                bbox,
                width: args.width,
                height: args.height,
            });
            if !result.success {
                return Err("query box does not intersect the map".into());
            }

            println!("depth: {}", result.depth);
            println!("ul: {} {}", result.raster.ul_lon, result.raster.ul_lat);
            println!("lr: {} {}", result.raster.lr_lon, result.raster.lr_lat);
            for row in &result.grid {
                let names: Vec<String> = row.iter().map(|t| t.file_name()).collect();
                println!("{}", names.join(" "));
            }
        }

        Command::Search { graph, prefix } => {
            let g = load_graph(&graph)?;
            let places = bearmaps::PlaceIndex::from_graph(&g);
            for name in places.names_by_prefix(&prefix) {
                println!("{name}");
            }
        }

        Command::Locate { graph, name } => {
            let g = load_graph(&graph)?;
            let places = bearmaps::PlaceIndex::from_graph(&g);
            for l in places.locations(&name) {
                println!("{}\t{}\t{}\t{}", l.id, l.lon, l.lat, l.name);
            }
        }
    }

    Ok(())
}

fn find_route(args: &RouteArgs) -> Result<(bearmaps::Graph, Vec<i64>), Box<dyn Error>> {
    let g = load_graph(&args.graph)?;
    let route =
        bearmaps::shortest_path(&g, args.start_lon, args.start_lat, args.end_lon, args.end_lat)?;

    if let Some(length) = g.path_length(&route) {
        log::info!("found route over {} nodes, {:.3} miles long", route.len(), length);
    }
    Ok((g, route))
}

fn print_geojson(g: &bearmaps::Graph, route: &[i64]) {
    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!("      \"properties\": {{}},");

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut vertices = route.iter().filter_map(|&id| g.get_vertex(id)).peekable();
    while let Some(v) = vertices.next() {
        let suffix = if vertices.peek().is_some() { "," } else { "" };
        println!("          [{}, {}]{}", v.lon, v.lat, suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");
}

fn load_graph(args: &GraphArgs) -> Result<bearmaps::Graph, GraphLoadError> {
    let options = bearmaps::osm::Options {
        profile: &bearmaps::osm::CAR_PROFILE,
        file_format: bearmaps::osm::FileFormat::Unknown,
        prune_isolated: args.prune_isolated,
    };
    read_graph(&options, &args.osm_file)
}

fn read_graph<P: AsRef<Path>>(
    options: &bearmaps::osm::Options<'_>,
    path: P,
) -> Result<bearmaps::Graph, GraphLoadError> {
    bearmaps::osm::graph_from_file(options, path.as_ref())
        .map_err(|e| GraphLoadError(PathBuf::from(path.as_ref()), e))
}
