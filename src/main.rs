use apiprobe::error::AppResult;

fn main() -> AppResult<()> {
    apiprobe::entry::run()
}
