use di718_device::autodiscover;

use crate::cmd::DiscoverArgs;
use crate::exit::{CliError, CliResult, SUCCESS, UNAVAILABLE};

pub fn run(_args: DiscoverArgs) -> CliResult<i32> {
    if let Some(host) = autodiscover() {
        println!("{host}");
        return Ok(SUCCESS);
    }

    eprintln!(
        "Autodiscovery is not implemented.\n\
         If your DHCP server registers hostnames, the unit's DHCP name will resolve\n\
         directly. Otherwise use the 'DATAQ Instruments Hardware Manager' utility\n\
         shipped with WinDAQ, check your DHCP logs for MAC addresses starting with\n\
         00:80:A3, or implement the Lantronix discovery protocol:\n\
         http://wiki.lantronix.com/developer/Lantronix_Discovery_Protocol"
    );
    Err(CliError::new(UNAVAILABLE, "no unit discovered"))
}
