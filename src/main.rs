mod app;
mod audio;
mod config;
mod error;
mod library;
mod runtime;
mod sync;
mod ui;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
