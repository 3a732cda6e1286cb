/// What the snapshot stream hands to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Connect,
    Disconnect,
    ConnectError(String),
    /// Raw JSON body of one `simulation_state` message.
    SimulationState(Vec<u8>),
}
