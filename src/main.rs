use mish::flags::Flags;
use mish::shell::Shell;
use std::env;
use std::process::ExitCode;

fn main() -> Result<ExitCode, mish::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if flags.is_set("version") {
        println!("mish {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    mish::logging::init(&flags);

    let command = flags.get_value("command").cloned();
    let mut shell = Shell::new(flags)?;
    shell.install_signal_handlers()?;

    let code = match command {
        Some(line) => shell.run_command(&line),
        None => shell.run()?,
    };
    Ok(ExitCode::from(code as u8))
}
