use log::{debug, error};

fn main() {
    if let Err(err) = project_parser::run() {
        error!("{err:#}");
        debug!("{err:?}");
        std::process::exit(1);
    }
}
