use probe_table::shell::{reader::Flow, Shell, ShellOptions};
use std::{env, io, process};

fn main() -> io::Result<()> {
    let options = match ShellOptions::from_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: probe_table [--verbose] [--echo] [--stats]");
            process::exit(2);
        }
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(options.log_level())
        .with_target(false)
        .init();

    let mut shell = Shell::new(io::stdout(), options);
    let mut buffer = String::new();
    loop {
        if io::stdin().read_line(&mut buffer)? == 0 {
            break;
        }
        match shell.run_line(&buffer) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("{e}"),
        }
        buffer.clear();
    }
    Ok(())
}
