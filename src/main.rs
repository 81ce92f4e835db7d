use junit_diff::cli;

fn main() {
    let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());

    // The exit code is the number of distinct tests, or -1 on error.
    let code = cli::run(args);
    std::process::exit(code);
}
