use clap::Parser;

mod commands;
mod output;

use commands::rewrite::{self, RewriteArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "idrewrite")]
#[command(version = VERSION)]
#[command(about = "Rename identifiers in C, C++, CUDA and Fortran sources")]
#[command(long_about = "Rename identifiers in C, C++, CUDA and Fortran sources.\n\n\
    Code tokens, preprocessor directives and include targets are rewritten \
    from a rename table; strings and comments are left untouched.")]
struct Cli {
    #[command(flatten)]
    args: RewriteArgs,

    /// Print a JSON envelope instead of progress lines
    #[arg(long)]
    json: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    let plan = match rewrite::plan(cli.args) {
        Ok(plan) => plan,
        Err(err) => {
            if json {
                let _ = output::print_error(&err);
            } else {
                output::print_error_text(&err);
            }
            let code = output::exit_code_for_error(err.code);
            return std::process::ExitCode::from(exit_code_to_u8(code));
        }
    };

    if json {
        let (json_result, exit_code) = output::map_cmd_result_to_json(rewrite::run(&plan));
        let _ = output::print_json_result(json_result);
        return std::process::ExitCode::from(exit_code_to_u8(exit_code));
    }

    println!("{}", output::START_BANNER);
    let exit_code = match rewrite::run_with_progress(&plan, output::print_outcome) {
        Ok((_, exit_code)) => exit_code,
        Err(err) => {
            output::print_error_text(&err);
            output::exit_code_for_error(err.code)
        }
    };
    println!("{}", output::DONE_BANNER);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
