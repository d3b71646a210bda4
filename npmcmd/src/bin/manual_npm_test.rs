use npmcmd::{npm_available, FlagMap, InstallOptions, Npm};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("🚀 Manual npm builder test");
    println!("==========================");

    println!("\n📋 Step 1: Checking for npm on PATH...");
    if !npm_available() {
        println!("❌ npm not found, nothing to run");
        return Ok(());
    }
    println!("✅ npm found");

    println!("\n🔍 Step 2: Rendering passthrough flags...");
    let mut flags = FlagMap::new();
    flags.insert("silent", "");
    flags.insert("loglevel", "warn");
    println!("   Flags render as: {:?}", flags.render());

    println!("\n⚡ Step 3: Bare install in the temp dir (captured output)...");
    let mut npm = Npm::new();
    match npm
        .current_dir(Some(std::env::temp_dir()))
        .output(false)
        .install(None, InstallOptions::default())
    {
        Some(output) => {
            println!("✅ npm install succeeded");
            for line in output.lines().take(5) {
                println!("   {}", line);
            }
        }
        None => println!("❌ npm install failed (no diagnostics by contract)"),
    }

    println!("\n🎉 Done");
    Ok(())
}
