// web-server/src/salt/demo.rs
//! Canned salt-api answers served when demo mode is on and the master is
//! unreachable. Shapes follow what salt-api returns for each verb.
use serde_json::{json, Value};

use super::Verb;

pub const DEMO_SESSION_TOKEN: &str = "demo-session";

const MINIONS: [&str; 3] = ["minion-1", "minion-2", "minion-3"];

fn per_minion(value: Value) -> Value {
    let map = MINIONS
        .iter()
        .map(|id| (id.to_string(), value.clone()))
        .collect::<serde_json::Map<_, _>>();
    Value::Object(map)
}

fn minion(id: &str, os: &str, release: &str) -> Value {
    json!({
        "id": id,
        "os": os,
        "osrelease": release,
        "status": "up",
        "grains": {"os": os, "osrelease": release, "kernel": "Linux", "num_cpus": 2},
        "pillars": {"role": "web"}
    })
}

/// Sample upstream response for `verb`
pub fn sample(verb: Verb) -> Value {
    let data = match verb {
        Verb::ListMinions | Verb::GetMinion => json!({
            "minion-1": minion("minion-1", "Ubuntu", "22.04"),
            "minion-2": minion("minion-2", "Ubuntu", "22.04"),
            "minion-3": minion("minion-3", "CentOS", "9")
        }),
        Verb::ListJobs => json!({
            "20240113001": {
                "function": "test.ping",
                "minions": MINIONS,
                "start_time": "2024-01-13T08:00:00",
                "status": "completed"
            }
        }),
        Verb::GetJob => json!({
            "function": "test.ping",
            "minions": MINIONS,
            "start_time": "2024-01-13T08:00:00",
            "end_time": "2024-01-13T08:00:02",
            "status": "completed",
            "result": per_minion(json!(true))
        }),
        Verb::Execute | Verb::SshExecute | Verb::MineSend => per_minion(json!(true)),
        Verb::Grains => per_minion(json!({"os": "Ubuntu", "osrelease": "22.04", "kernel": "Linux"})),
        Verb::Pillars => per_minion(json!({"role": "web", "environment": "demo"})),
        Verb::PillarKeys => per_minion(json!(["role", "environment"])),
        Verb::PillarItem => per_minion(json!("web")),
        Verb::ListStates => per_minion(json!(["common", "webserver.nginx", "users"])),
        Verb::ApplyState | Verb::Highstate => per_minion(json!({
            "pkg_|-nginx_|-nginx_|-installed": {
                "result": true,
                "comment": "All specified packages are already installed",
                "changes": {}
            }
        })),
        Verb::StateStatus => per_minion(json!([])),
        Verb::ListSchedules => per_minion(json!("schedule: {}\n")),
        Verb::AddSchedule | Verb::DeleteSchedule | Verb::AddBeacon | Verb::DeleteBeacon => {
            per_minion(json!({"result": true, "comment": "Demo mode: nothing changed"}))
        }
        Verb::ListBeacons => per_minion(json!({})),
        Verb::ListKeys => json!({
            "data": {
                "return": {
                    "minions": MINIONS,
                    "minions_pre": ["minion-4"],
                    "minions_rejected": [],
                    "minions_denied": []
                },
                "success": true
            }
        }),
        Verb::AcceptKey | Verb::RejectKey | Verb::DeleteKey => {
            json!({"data": {"return": {}, "success": true}})
        }
        Verb::Runner | Verb::Orchestrate | Verb::CloudCreate => json!({}),
        Verb::ListFiles => json!(["top.sls", "common/init.sls", "webserver/nginx.sls"]),
        Verb::FileRoots => json!({"data": {"return": {"base": {"/srv/salt": {}}}, "success": true}}),
        Verb::FileContent => json!({"data": {"return": [], "success": true}}),
        Verb::CloudProviders => json!({}),
        Verb::CloudProfiles => json!({}),
        Verb::Events => json!([]),
        Verb::Nodegroups => json!({}),
        Verb::Reactors => json!([]),
        Verb::MineGet => per_minion(json!({})),
        Verb::Returners => per_minion(json!(["local", "local_cache"])),
    };

    json!({ "return": [data] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_verb_has_sample_in_return_envelope() {
        for verb in Verb::ALL {
            let sample = sample(verb);
            assert_eq!(sample["return"].as_array().map(Vec::len), Some(1), "{}", verb);
        }
    }

    #[test]
    fn test_minion_listing_has_three_nodes() {
        let listing = sample(Verb::ListMinions);
        assert_eq!(listing["return"][0].as_object().unwrap().len(), 3);
    }
}
