use anyhow::{Context, Result, bail};
use colored::Colorize;
use cpci429::{
    CPCI429_IOCTL_IN_BUFFERED, CPCI429_IOCTL_OUT_BUFFERED, CPCI429_IOCTL_READ_PADDRESS,
    CPCI429_IOCTL_WRITE_OFFSETADDRESS, CmResource, Completion, DeviceId, Driver, DriverConfig,
    IoRequest, PowerState, SimulatedMapper,
};

const BAR0_BASE: u64 = 0xFEB0_0000; // Where the simulated card's BAR0 sits
const DEFAULT_WINDOW_SIZE: u32 = 0x1000; // 4 KiB register window

const USAGE: &str = "usage: cpci429-sim [--window <size>] <op>...
ops:
  offset <value>        set the register offset
  write <value>         write a register at the current offset
  read                  read the register at the current offset
  paddr                 read the card's physical address
  raw <code> [value]    send an arbitrary control code";

#[derive(Debug)]
enum Command {
    Offset(u32),
    Write(u32),
    Read,
    PhysicalAddress,
    Raw { code: u32, value: Option<u32> },
}

fn parse_number(text: &str) -> Result<u32> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid number '{text}'"))
}

fn next_value<'a>(args: &mut impl Iterator<Item = &'a str>, op: &str) -> Result<u32> {
    let text = args
        .next()
        .with_context(|| format!("'{op}' needs a value"))?;
    parse_number(text)
}

fn parse_args(args: &[String]) -> Result<(u32, Vec<Command>)> {
    let mut window = DEFAULT_WINDOW_SIZE;
    let mut commands = Vec::new();
    let mut args = args.iter().map(String::as_str).peekable();

    while let Some(arg) = args.next() {
        let command = match arg {
            "--window" => {
                window = next_value(&mut args, arg)?;
                continue;
            }
            "offset" => Command::Offset(next_value(&mut args, arg)?),
            "write" => Command::Write(next_value(&mut args, arg)?),
            "read" => Command::Read,
            "paddr" => Command::PhysicalAddress,
            "raw" => {
                let code = next_value(&mut args, arg)?;
                let value = match args.peek().copied() {
                    Some(next) if parse_number(next).is_ok() => Some(next_value(&mut args, arg)?),
                    _ => None,
                };
                Command::Raw { code, value }
            }
            "-h" | "--help" => bail!("{USAGE}"),
            other => bail!("unknown op '{other}'\n{USAGE}"),
        };
        commands.push(command);
    }

    Ok((window, commands))
}

fn execute(driver: &Driver, id: DeviceId, command: &Command) -> Result<(Completion, Option<u32>)> {
    let (code, input) = match *command {
        Command::Offset(offset) => (CPCI429_IOCTL_WRITE_OFFSETADDRESS, Some(offset)),
        Command::Write(value) => (CPCI429_IOCTL_IN_BUFFERED, Some(value)),
        Command::Read => (CPCI429_IOCTL_OUT_BUFFERED, None),
        Command::PhysicalAddress => (CPCI429_IOCTL_READ_PADDRESS, None),
        Command::Raw { code, value } => (code, value),
    };

    let input = input.map(u32::to_le_bytes);
    let mut output = [0u8; 4];
    let completion = driver.submit(
        id,
        &mut IoRequest::new(code, input.as_ref().map_or(&[][..], |bytes| &bytes[..]), &mut output),
    )?;

    let value = (completion.is_success() && input.is_none()).then(|| u32::from_le_bytes(output));
    Ok((completion, value))
}

fn run() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (window, commands) = parse_args(&args)?;
    if commands.is_empty() {
        bail!("{USAGE}");
    }

    // Bring up one simulated card
    let mut driver = Driver::new(DriverConfig::default());
    let id = driver.device_add();
    let bar0 = CmResource::Memory {
        start: BAR0_BASE,
        length: window,
    };
    driver.with_device(id, |device| -> Result<()> {
        device
            .prepare_hardware(&[bar0], &[bar0], &mut SimulatedMapper::default())
            .context("prepare hardware")?;
        device.d0_entry(PowerState::D3)?;
        Ok(())
    })??;

    for interface in driver.interfaces() {
        println!("{} {}", "interface".bright_cyan().bold(), interface.symbolic_link);
    }

    for command in &commands {
        let (completion, value) = execute(&driver, id, command)?;
        let label = format!("{command:?}");
        let status = completion.status().to_string();
        let status = status.as_str();
        let status = if completion.is_success() {
            status.green()
        } else {
            status.red()
        };
        match value {
            Some(value) => println!(
                "{label:<40} {status} [{} bytes] => {value:#010x}",
                completion.information()
            ),
            None => println!("{label:<40} {status} [{} bytes]", completion.information()),
        }
    }

    driver.with_device(id, |device| -> Result<()> {
        device.d0_exit(PowerState::D3)?;
        device.release_hardware()?;
        Ok(())
    })??;
    driver.device_remove(id)?;

    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}
