use std::time::Duration;

use robotiq_rs::*;

#[tokio::main]
async fn main() -> Result<(), RobotiqError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The serial port path, and an optional JSON configuration file
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let config = match args.next() {
        Some(file) => GripperConfig::from_json_file(file)?,
        None => GripperConfig::default(),
    };

    // create a connection to serial RS485 modbus
    let mut gripper = RobotiqGripper::from_config(path, config)?;

    // Reset and Activation of Gripper
    //
    // the gripper will open and close, a second call is a no-op.
    gripper.activate().await?.activate().await?;
    log::info!("finished activation.");

    // Basic Gripper Command
    //
    // set gripper with position, speed and force, then poll until it stops
    gripper.move_to(0x08, 0x00, 0x00).await?;
    let status = gripper
        .wait_until_settled(Duration::from_millis(100), 100)
        .await?;
    log::info!("Object Detect Status : {:?}", status.object);

    let status = gripper.go_to_and_wait(0xFF, 0xFF, 0xFF).await?;
    log::info!(
        "closed at {} (object detected: {}, ~{} mA)",
        status.current_position,
        status.object_detected(),
        status.approx_current_ma()
    );

    // Millimeter positioning
    //
    // 2F-85 fingers are 0 mm apart closed and 85 mm apart open
    gripper.calibrate(0.0, 85.0).await?;
    gripper.move_to_mm(42.5).await?;
    gripper
        .wait_until_settled(Duration::from_millis(100), 100)
        .await?;
    log::info!("opening : {:.1} mm", gripper.read_position_mm().await?);

    // Automatic Release Routine
    //
    // you will need to reactivate the gripper after automatic release routine
    gripper.move_to(0xFF, 0x00, 0x00).await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    gripper
        .automatic_release(AutoReleaseDirection::Open)
        .await?
        .await_automatic_release()
        .await?;
    log::info!("state after release : {:?}", gripper.state());
    gripper.activate().await?;

    gripper.open().await?;
    gripper.disconnect().await?;

    Ok(())
}
