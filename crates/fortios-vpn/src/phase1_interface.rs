//! `vpn.ipsec/phase1-interface` resource.
//!
//! Phase 1 (IKE SA) settings of a route-based IPsec tunnel. The table is large but flat:
//! besides scalars it carries four repeated blocks (`certificate`, `ipv4_exclude_range`,
//! `ipv6_exclude_range` and `backup_gateway`).
//!
//! `psksecret` is never returned by the API and is declared write-only. The other
//! secrets come back as `ENC ...` placeholders, so reads keep their local value.

use std::sync::Arc;

use fortios_core::{CmdbTransport, FieldSpec, Resource, ResourceSpec};

const ENABLE_DISABLE: &[&str] = &["enable", "disable"];
const AUTH_METHODS: &[&str] = &["psk", "signature"];
const PEER_TYPES: &[&str] = &["any", "one", "dialup", "peer", "peergrp"];

const CERTIFICATE_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("name", "name").len(0, 64),
];

const IPV4_EXCLUDE_RANGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::int("id", "id"),
    FieldSpec::string("start_ip", "start-ip"),
    FieldSpec::string("end_ip", "end-ip"),
];

const IPV6_EXCLUDE_RANGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::int("id", "id"),
    FieldSpec::string("start_ip", "start-ip"),
    FieldSpec::string("end_ip", "end-ip"),
];

const BACKUP_GATEWAY_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("address", "address").len(0, 64),
];

/// Schema of an IPsec phase 1 interface.
pub static PHASE1_INTERFACE: ResourceSpec = ResourceSpec {
    type_name: "VpnIpsecPhase1Interface",
    path: "vpn.ipsec/phase1-interface",
    fields: &[
        FieldSpec::string("name", "name").len(0, 15),
        FieldSpec::string("type", "type").one_of(&["static", "dynamic", "ddns"]),
        FieldSpec::string("interface", "interface").len(0, 35).required(),
        FieldSpec::string("ip_version", "ip-version").one_of(&["4", "6"]),
        FieldSpec::string("ike_version", "ike-version").one_of(&["1", "2"]),
        FieldSpec::string("local_gw", "local-gw"),
        FieldSpec::string("local_gw6", "local-gw6"),
        FieldSpec::string("remote_gw", "remote-gw").required(),
        FieldSpec::string("remote_gw6", "remote-gw6"),
        FieldSpec::string("remotegw_ddns", "remotegw-ddns").len(0, 63),
        FieldSpec::int("keylife", "keylife").range(120, 172_800),
        FieldSpec::list("certificate", "certificate", CERTIFICATE_FIELDS),
        FieldSpec::string("authmethod", "authmethod").one_of(AUTH_METHODS),
        FieldSpec::string("authmethod_remote", "authmethod-remote").one_of(AUTH_METHODS),
        FieldSpec::string("mode", "mode").one_of(&["aggressive", "main"]),
        FieldSpec::string("peertype", "peertype").one_of(PEER_TYPES),
        FieldSpec::string("peerid", "peerid").len(0, 255),
        FieldSpec::string("default_gw", "default-gw"),
        FieldSpec::int("default_gw_priority", "default-gw-priority"),
        FieldSpec::string("usrgrp", "usrgrp").len(0, 35),
        FieldSpec::string("peer", "peer").len(0, 35),
        FieldSpec::string("peergrp", "peergrp").len(0, 35),
        FieldSpec::string("monitor", "monitor").len(0, 35),
        FieldSpec::string("monitor_hold_down_type", "monitor-hold-down-type"),
        FieldSpec::int("monitor_hold_down_delay", "monitor-hold-down-delay").range(0, 31_536_000),
        FieldSpec::string("monitor_hold_down_weekday", "monitor-hold-down-weekday"),
        FieldSpec::string("monitor_hold_down_time", "monitor-hold-down-time"),
        FieldSpec::string("net_device", "net-device").required(),
        FieldSpec::string("tunnel_search", "tunnel-search"),
        FieldSpec::string("passive_mode", "passive-mode").one_of(ENABLE_DISABLE),
        FieldSpec::string("exchange_interface_ip", "exchange-interface-ip"),
        FieldSpec::string("exchange_ip_addr4", "exchange-ip-addr4"),
        FieldSpec::string("exchange_ip_addr6", "exchange-ip-addr6"),
        FieldSpec::string("mode_cfg", "mode-cfg").one_of(ENABLE_DISABLE),
        FieldSpec::string("assign_ip", "assign-ip").one_of(ENABLE_DISABLE),
        FieldSpec::string("assign_ip_from", "assign-ip-from"),
        FieldSpec::string("ipv4_start_ip", "ipv4-start-ip"),
        FieldSpec::string("ipv4_end_ip", "ipv4-end-ip"),
        FieldSpec::string("ipv4_netmask", "ipv4-netmask"),
        FieldSpec::string("dns_mode", "dns-mode"),
        FieldSpec::string("ipv4_dns_server1", "ipv4-dns-server1"),
        FieldSpec::string("ipv4_dns_server2", "ipv4-dns-server2"),
        FieldSpec::string("ipv4_dns_server3", "ipv4-dns-server3"),
        FieldSpec::string("ipv4_wins_server1", "ipv4-wins-server1"),
        FieldSpec::string("ipv4_wins_server2", "ipv4-wins-server2"),
        FieldSpec::list("ipv4_exclude_range", "ipv4-exclude-range", IPV4_EXCLUDE_RANGE_FIELDS),
        FieldSpec::string("ipv4_split_include", "ipv4-split-include").len(0, 63),
        FieldSpec::string("split_include_service", "split-include-service").len(0, 63),
        FieldSpec::string("ipv4_name", "ipv4-name").len(0, 63),
        FieldSpec::string("ipv6_start_ip", "ipv6-start-ip"),
        FieldSpec::string("ipv6_end_ip", "ipv6-end-ip"),
        FieldSpec::int("ipv6_prefix", "ipv6-prefix").range(1, 128),
        FieldSpec::string("ipv6_dns_server1", "ipv6-dns-server1"),
        FieldSpec::string("ipv6_dns_server2", "ipv6-dns-server2"),
        FieldSpec::string("ipv6_dns_server3", "ipv6-dns-server3"),
        FieldSpec::list("ipv6_exclude_range", "ipv6-exclude-range", IPV6_EXCLUDE_RANGE_FIELDS),
        FieldSpec::string("ipv6_split_include", "ipv6-split-include").len(0, 63),
        FieldSpec::string("ipv6_name", "ipv6-name").len(0, 63),
        FieldSpec::string("unity_support", "unity-support").one_of(ENABLE_DISABLE),
        FieldSpec::string("domain", "domain").len(0, 63),
        FieldSpec::string("banner", "banner").len(0, 1024),
        FieldSpec::string("include_local_lan", "include-local-lan").one_of(ENABLE_DISABLE),
        FieldSpec::string("ipv4_split_exclude", "ipv4-split-exclude").len(0, 63),
        FieldSpec::string("ipv6_split_exclude", "ipv6-split-exclude").len(0, 63),
        FieldSpec::string("save_password", "save-password").one_of(ENABLE_DISABLE),
        FieldSpec::string("client_auto_negotiate", "client-auto-negotiate"),
        FieldSpec::string("client_keep_alive", "client-keep-alive"),
        FieldSpec::list("backup_gateway", "backup-gateway", BACKUP_GATEWAY_FIELDS),
        FieldSpec::string("proposal", "proposal").required(),
        FieldSpec::string("add_route", "add-route").one_of(ENABLE_DISABLE),
        FieldSpec::string("add_gw_route", "add-gw-route"),
        FieldSpec::string("psksecret", "psksecret").write_only(),
        FieldSpec::string("psksecret_remote", "psksecret-remote").secret(),
        FieldSpec::int("keepalive", "keepalive").range(10, 900),
        FieldSpec::int("distance", "distance").range(1, 255),
        FieldSpec::int("priority", "priority"),
        FieldSpec::string("localid", "localid").len(0, 63),
        FieldSpec::string("localid_type", "localid-type"),
        FieldSpec::string("auto_negotiate", "auto-negotiate").one_of(ENABLE_DISABLE),
        FieldSpec::int("negotiate_timeout", "negotiate-timeout").range(1, 300),
        FieldSpec::string("fragmentation", "fragmentation").one_of(ENABLE_DISABLE),
        FieldSpec::string("dpd", "dpd").one_of(&["disable", "on-idle", "on-demand"]),
        FieldSpec::int("dpd_retrycount", "dpd-retrycount").range(0, 10),
        FieldSpec::string("dpd_retryinterval", "dpd-retryinterval"),
        FieldSpec::string("forticlient_enforcement", "forticlient-enforcement"),
        FieldSpec::string("comments", "comments").len(0, 255),
        FieldSpec::string("send_cert_chain", "send-cert-chain"),
        FieldSpec::string("dhgrp", "dhgrp"),
        FieldSpec::string("suite_b", "suite-b"),
        FieldSpec::string("eap", "eap"),
        FieldSpec::string("eap_identity", "eap-identity"),
        FieldSpec::string("acct_verify", "acct-verify"),
        FieldSpec::string("ppk", "ppk"),
        FieldSpec::string("ppk_secret", "ppk-secret").secret(),
        FieldSpec::string("ppk_identity", "ppk-identity").len(0, 35),
        FieldSpec::string("wizard_type", "wizard-type"),
        FieldSpec::string("xauthtype", "xauthtype"),
        FieldSpec::string("reauth", "reauth"),
        FieldSpec::string("authusr", "authusr").len(0, 64),
        FieldSpec::string("authpasswd", "authpasswd").len(0, 128).secret(),
        FieldSpec::string("group_authentication", "group-authentication").one_of(ENABLE_DISABLE),
        FieldSpec::string("group_authentication_secret", "group-authentication-secret").secret(),
        FieldSpec::string("authusrgrp", "authusrgrp").len(0, 35),
        FieldSpec::string("mesh_selector_type", "mesh-selector-type"),
        FieldSpec::string("idle_timeout", "idle-timeout"),
        FieldSpec::int("idle_timeoutinterval", "idle-timeoutinterval").range(5, 43_200),
        FieldSpec::string("ha_sync_esp_seqno", "ha-sync-esp-seqno").one_of(ENABLE_DISABLE),
        FieldSpec::string("auto_discovery_sender", "auto-discovery-sender").one_of(ENABLE_DISABLE),
        FieldSpec::string("auto_discovery_receiver", "auto-discovery-receiver")
            .one_of(ENABLE_DISABLE),
        FieldSpec::string("auto_discovery_forwarder", "auto-discovery-forwarder")
            .one_of(ENABLE_DISABLE),
        FieldSpec::string("auto_discovery_psk", "auto-discovery-psk").one_of(ENABLE_DISABLE),
        FieldSpec::string("encapsulation", "encapsulation"),
        FieldSpec::string("encapsulation_address", "encapsulation-address"),
        FieldSpec::string("encap_local_gw4", "encap-local-gw4"),
        FieldSpec::string("encap_local_gw6", "encap-local-gw6"),
        FieldSpec::string("encap_remote_gw4", "encap-remote-gw4"),
        FieldSpec::string("encap_remote_gw6", "encap-remote-gw6"),
        FieldSpec::int("vni", "vni").range(1, 16_777_215),
        FieldSpec::string("nattraversal", "nattraversal").one_of(&["enable", "disable", "forced"]),
        FieldSpec::int("fragmentation_mtu", "fragmentation-mtu").range(500, 16_000),
        FieldSpec::string("childless_ike", "childless-ike").one_of(ENABLE_DISABLE),
        FieldSpec::string("rekey", "rekey").one_of(ENABLE_DISABLE),
        FieldSpec::string("digital_signature_auth", "digital-signature-auth"),
        FieldSpec::string("signature_hash_alg", "signature-hash-alg"),
        FieldSpec::string("rsa_signature_format", "rsa-signature-format"),
        FieldSpec::string("enforce_unique_id", "enforce-unique-id"),
        FieldSpec::string("cert_id_validation", "cert-id-validation"),
    ],
};

/// Orchestrator for phase 1 interfaces.
#[must_use]
pub fn phase1_interface(transport: Arc<dyn CmdbTransport>) -> Resource {
    Resource::new(&PHASE1_INTERFACE, transport)
}
