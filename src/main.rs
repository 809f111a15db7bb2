mod entry;
mod logger;

use scalesweep::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
