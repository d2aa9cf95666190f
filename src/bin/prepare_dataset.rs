use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    resume_strata::apps::run_prepare_dataset(std::env::args().skip(1))
}
