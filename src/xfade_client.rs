use crate::config::Config;
use crate::control;
use crate::cross_fader::{StereoIn, StereoOut};
use crate::shutdown::Shutdown;
use crate::xfade::{self, Controls, Xfade};
use thiserror::Error;
use tracing::{info, warn};

struct XfadeClient {
    in_a: [jack::Port<jack::AudioIn>; 2],
    in_b: [jack::Port<jack::AudioIn>; 2],
    out: [jack::Port<jack::AudioOut>; 2],

    xfade: Xfade,
    controls: Controls,
    control: control::Receiver,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    JackError(#[from] jack::Error),

    #[error(transparent)]
    EngineError(#[from] xfade::Error),
}

fn register_inputs(
    client: &jack::Client,
    names: &[String; 2],
) -> Result<[jack::Port<jack::AudioIn>; 2], Error> {
    Ok([
        client.register_port(&names[0], jack::AudioIn::default())?,
        client.register_port(&names[1], jack::AudioIn::default())?,
    ])
}

impl XfadeClient {
    fn new(
        client: &jack::Client,
        config: &Config,
        control: control::Receiver,
    ) -> Result<XfadeClient, Error> {
        let ports = &config.client;
        let in_a = register_inputs(client, &ports.in_a)?;
        let in_b = register_inputs(client, &ports.in_b)?;
        let out = [
            client.register_port(&ports.out[0], jack::AudioOut::default())?,
            client.register_port(&ports.out[1], jack::AudioOut::default())?,
        ];

        let xfade = Xfade::create(client.sample_rate() as f64, config.variant)?;
        info!(
            "Engine created: {:?} variant at {} Hz, buffer size {}",
            xfade.variant(),
            xfade.sample_rate(),
            client.buffer_size()
        );

        Ok(XfadeClient {
            in_a,
            in_b,
            out,
            xfade,
            controls: config.controls,
            control,
        })
    }

    // runs on the JACK real-time thread: no locks, no allocation, no logging
    fn process(&mut self, ps: &jack::ProcessScope) -> jack::Control {
        control::drain(&self.control, &mut self.controls);

        let in_a = StereoIn::new(self.in_a[0].as_slice(ps), self.in_a[1].as_slice(ps));
        let in_b = StereoIn::new(self.in_b[0].as_slice(ps), self.in_b[1].as_slice(ps));
        let [out_left, out_right] = &mut self.out;
        let out = StereoOut::new(out_left.as_mut_slice(ps), out_right.as_mut_slice(ps));

        self.xfade.process(&self.controls, in_a, in_b, out);

        jack::Control::Continue
    }
}

pub fn main(shutdown: Shutdown, config: Config, control: control::Receiver) -> Result<(), Error> {
    let (client, status) =
        jack::Client::new(&config.client.name, jack::ClientOptions::NO_START_SERVER)?;
    info!("JACK client {} opened ({:?})", client.name(), status);

    let mut xfade_client = XfadeClient::new(&client, &config, control)?;

    let process = jack::ClosureProcessHandler::new(
        move |_: &jack::Client, ps: &jack::ProcessScope| -> jack::Control { xfade_client.process(ps) },
    );

    let active_client = client.activate_async((), process)?;

    for (source, destination) in &config.client.connect {
        match active_client
            .as_client()
            .connect_ports_by_name(source, destination)
        {
            Ok(()) => info!("Connected {} -> {}", source, destination),
            Err(error) => warn!("Failed to connect {} -> {}: {}", source, destination, error),
        }
    }

    shutdown.wait();
    info!("Shutting down");

    active_client.deactivate()?;

    Ok(())
}
