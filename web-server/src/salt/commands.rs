// web-server/src/salt/commands.rs
//! Every salt-api operation the gateway uses, as data. A `Verb` knows how it
//! is dispatched; a `Command` carries the per-call arguments and renders the
//! HTTP request.
use reqwest::Method;
use serde_json::{Map, Value};
use std::fmt;

use super::UpstreamError;

/// salt-api client kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Local,
    Runner,
    Wheel,
    Ssh,
}

impl ClientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientKind::Local => "local",
            ClientKind::Runner => "runner",
            ClientKind::Wheel => "wheel",
            ClientKind::Ssh => "ssh",
        }
    }

    /// Field the target is sent in; runners take none
    fn target_field(&self) -> Option<&'static str> {
        match self {
            ClientKind::Local | ClientKind::Ssh => Some("tgt"),
            ClientKind::Wheel => Some("match"),
            ClientKind::Runner => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Plain GET on a salt-api REST collection, optionally keyed by id
    Resource { collection: &'static str, keyed: bool },
    /// Lowstate chunk POSTed to `/`. `fun: None` means the caller names it.
    Lowstate { client: ClientKind, fun: Option<&'static str> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    ListMinions,
    GetMinion,
    ListJobs,
    GetJob,
    Execute,
    Grains,
    Pillars,
    PillarKeys,
    PillarItem,
    ListStates,
    ApplyState,
    Highstate,
    StateStatus,
    ListSchedules,
    AddSchedule,
    DeleteSchedule,
    ListKeys,
    AcceptKey,
    RejectKey,
    DeleteKey,
    Runner,
    ListFiles,
    FileRoots,
    FileContent,
    Orchestrate,
    ListBeacons,
    AddBeacon,
    DeleteBeacon,
    CloudProviders,
    CloudProfiles,
    CloudCreate,
    SshExecute,
    Events,
    Nodegroups,
    Reactors,
    MineGet,
    MineSend,
    Returners,
}

impl Verb {
    pub const ALL: [Verb; 38] = [
        Verb::ListMinions,
        Verb::GetMinion,
        Verb::ListJobs,
        Verb::GetJob,
        Verb::Execute,
        Verb::Grains,
        Verb::Pillars,
        Verb::PillarKeys,
        Verb::PillarItem,
        Verb::ListStates,
        Verb::ApplyState,
        Verb::Highstate,
        Verb::StateStatus,
        Verb::ListSchedules,
        Verb::AddSchedule,
        Verb::DeleteSchedule,
        Verb::ListKeys,
        Verb::AcceptKey,
        Verb::RejectKey,
        Verb::DeleteKey,
        Verb::Runner,
        Verb::ListFiles,
        Verb::FileRoots,
        Verb::FileContent,
        Verb::Orchestrate,
        Verb::ListBeacons,
        Verb::AddBeacon,
        Verb::DeleteBeacon,
        Verb::CloudProviders,
        Verb::CloudProfiles,
        Verb::CloudCreate,
        Verb::SshExecute,
        Verb::Events,
        Verb::Nodegroups,
        Verb::Reactors,
        Verb::MineGet,
        Verb::MineSend,
        Verb::Returners,
    ];

    pub fn dispatch(self) -> Dispatch {
        use ClientKind::*;

        let lowstate = |client, fun| Dispatch::Lowstate { client, fun: Some(fun) };
        let caller_named = |client| Dispatch::Lowstate { client, fun: None };

        match self {
            Verb::ListMinions => Dispatch::Resource { collection: "minions", keyed: false },
            Verb::GetMinion => Dispatch::Resource { collection: "minions", keyed: true },
            Verb::ListJobs => Dispatch::Resource { collection: "jobs", keyed: false },
            Verb::GetJob => Dispatch::Resource { collection: "jobs", keyed: true },
            Verb::Execute => caller_named(Local),
            Verb::Grains => lowstate(Local, "grains.items"),
            Verb::Pillars => lowstate(Local, "pillar.items"),
            Verb::PillarKeys => lowstate(Local, "pillar.ls"),
            Verb::PillarItem => lowstate(Local, "pillar.get"),
            Verb::ListStates => lowstate(Local, "cp.list_states"),
            Verb::ApplyState => lowstate(Local, "state.apply"),
            Verb::Highstate => lowstate(Local, "state.highstate"),
            Verb::StateStatus => lowstate(Local, "state.running"),
            Verb::ListSchedules => lowstate(Local, "schedule.list"),
            Verb::AddSchedule => lowstate(Local, "schedule.add"),
            Verb::DeleteSchedule => lowstate(Local, "schedule.delete"),
            Verb::ListKeys => lowstate(Wheel, "key.list_all"),
            Verb::AcceptKey => lowstate(Wheel, "key.accept"),
            Verb::RejectKey => lowstate(Wheel, "key.reject"),
            Verb::DeleteKey => lowstate(Wheel, "key.delete"),
            Verb::Runner => caller_named(Runner),
            Verb::ListFiles => lowstate(Runner, "fileserver.file_list"),
            Verb::FileRoots => lowstate(Wheel, "file_roots.list_roots"),
            Verb::FileContent => lowstate(Wheel, "file_roots.read"),
            Verb::Orchestrate => lowstate(Runner, "state.orchestrate"),
            Verb::ListBeacons => lowstate(Local, "beacons.list"),
            Verb::AddBeacon => lowstate(Local, "beacons.add"),
            Verb::DeleteBeacon => lowstate(Local, "beacons.delete"),
            Verb::CloudProviders => lowstate(Runner, "cloud.list_providers"),
            Verb::CloudProfiles => lowstate(Runner, "cloud.list_profiles"),
            Verb::CloudCreate => lowstate(Runner, "cloud.profile"),
            Verb::SshExecute => caller_named(Ssh),
            Verb::Events => lowstate(Runner, "state.event"),
            Verb::Nodegroups => lowstate(Runner, "config.get"),
            Verb::Reactors => lowstate(Runner, "reactor.list"),
            Verb::MineGet => lowstate(Local, "mine.get"),
            Verb::MineSend => lowstate(Local, "mine.send"),
            Verb::Returners => lowstate(Local, "sys.list_returners"),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Rendered HTTP request for salt-api
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

/// One salt-api call: a verb plus its arguments
#[derive(Debug, Clone)]
pub struct Command {
    verb: Verb,
    target: Option<String>,
    resource_id: Option<String>,
    function: Option<String>,
    args: Vec<Value>,
    kwargs: Map<String, Value>,
    extra: Map<String, Value>,
}

impl Command {
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            target: None,
            resource_id: None,
            function: None,
            args: Vec::new(),
            kwargs: Map::new(),
            extra: Map::new(),
        }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Glob addressing the minions (`tgt`), or the key match for wheel calls
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Id appended to a REST collection path
    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Function name for verbs whose function the caller chooses
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.args.extend(args);
        self
    }

    pub fn kwarg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.to_string(), value.into());
        self
    }

    pub fn kwargs(mut self, kwargs: Map<String, Value>) -> Self {
        self.kwargs.extend(kwargs);
        self
    }

    /// Extra top-level lowstate field, e.g. `roster`
    pub fn extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn request(&self) -> Result<Request, UpstreamError> {
        match self.verb.dispatch() {
            Dispatch::Resource { collection, keyed } => {
                let path = match (keyed, &self.resource_id) {
                    (false, _) => format!("/{}", collection),
                    (true, Some(id)) => format!("/{}/{}", collection, id),
                    (true, None) => return Err(self.incomplete("resource id")),
                };
                Ok(Request { method: Method::GET, path, payload: None })
            }
            Dispatch::Lowstate { client, fun } => {
                let fun = match (fun, &self.function) {
                    (Some(fun), _) => fun.to_string(),
                    (None, Some(function)) => function.clone(),
                    (None, None) => return Err(self.incomplete("function")),
                };

                let mut chunk = Map::new();
                chunk.insert("client".to_string(), Value::from(client.as_str()));

                match (client.target_field(), &self.target) {
                    (Some(field), Some(target)) => {
                        chunk.insert(field.to_string(), Value::from(target.as_str()));
                    }
                    (Some("tgt"), None) => return Err(self.incomplete("target")),
                    _ => {}
                }

                chunk.insert("fun".to_string(), Value::from(fun));
                if !self.args.is_empty() {
                    chunk.insert("arg".to_string(), Value::Array(self.args.clone()));
                }
                if !self.kwargs.is_empty() {
                    chunk.insert("kwarg".to_string(), Value::Object(self.kwargs.clone()));
                }
                for (key, value) in &self.extra {
                    chunk.insert(key.clone(), value.clone());
                }

                Ok(Request {
                    method: Method::POST,
                    path: "/".to_string(),
                    payload: Some(Value::Object(chunk)),
                })
            }
        }
    }

    fn incomplete(&self, what: &str) -> UpstreamError {
        UpstreamError::Incomplete(format!("{} needs a {}", self.verb, what))
    }
}
