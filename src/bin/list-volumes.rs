/// Diagnostic tool: show every volume the host reports and whether the
/// uploader would offer it.
use std::path::PathBuf;

use trace_uploader::ui::drives::{list_removable_volumes, HostVolumes, VolumeSource};
use trace_uploader::ui::menu::format_size;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trace_uploader=debug".parse()?),
        )
        .init();

    // Optional system volume override, as in the config file
    let system_volume = std::env::args().nth(1).map(PathBuf::from);
    let host = HostVolumes::new(system_volume.as_deref());

    println!("=== DIAGNOSTIC: Volume Enumeration ===");

    let probes = host.probe();
    println!("\n[1] Host reported {} volume(s)", probes.len());
    for probe in &probes {
        let capacity = match probe.total_bytes {
            Some(bytes) => format_size(bytes),
            None => "unavailable".to_string(),
        };
        println!(
            "    {:<6} root={} capacity={} system={}",
            probe.id,
            probe.root.display(),
            capacity,
            probe.is_system
        );
    }

    let offered = list_removable_volumes(&host);
    println!("\n[2] Offered for browsing: {}", offered.len());
    for (i, volume) in offered.iter().enumerate() {
        println!("    {:2}. {} ({})", i + 1, volume.id, format_size(volume.total_bytes));
    }

    if offered.is_empty() {
        println!("\n✗ No removable volumes would be offered");
    }

    Ok(())
}
