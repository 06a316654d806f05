//! Reference layout of one host release.
//!
//! The layout mirrors what a real server build exposes internally:
//! obfuscated single-letter message fields, a public client object that
//! wraps a private internal handle, and a per-client connection object
//! that accepts messages.
//!
//! ```text
//! CraftPlayer ──getHandle()──→ EntityPlayer ──playerConnection──→ PlayerConnection
//!                                                                   └─ sendPacket(Packet)
//! ```
//!
//! Every class is qualified with the release tag, so two releases installed
//! side by side never share a class.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::memory::{MemoryHost, MemoryHostBuilder};
use crate::{ClassDef, ClassRef, HostFault, ObjectRef, Value, ValueKind, Visibility};

/// Namespace prefix of the host's internal classes.
pub const INTERNAL_PREFIX: &str = "net.minecraft.server";

/// Namespace prefix of the host's implementation classes.
pub const IMPLEMENTATION_PREFIX: &str = "org.bukkit.craftbukkit";

/// First id handed out by the entity constructor.
const FIRST_ENTITY_ID: i32 = 1000;

/// One installed release: the host plus handles to the classes the
/// fixture needs for managing clients and worlds.
pub struct Release {
    version: String,
    host: Arc<MemoryHost>,
    entity_ids: Arc<AtomicI32>,
    craft_player: ClassRef,
    craft_world: ClassRef,
    entity_player: ClassRef,
    connection: ClassRef,
    world_server: ClassRef,
}

impl Release {
    /// Installs the reference layout for `version` (e.g. `v1_8_R3`) on a
    /// fresh host whose namespace is `org.bukkit.craftbukkit.<version>`.
    pub fn install(version: &str) -> Self {
        Self::install_with(MemoryHost::builder(), version)
    }

    /// Like [`install`](Self::install), starting from a configured builder.
    pub fn install_with(builder: MemoryHostBuilder, version: &str) -> Self {
        let host = builder
            .namespace(format!("{IMPLEMENTATION_PREFIX}.{version}"))
            .build();
        let entity_ids = Arc::new(AtomicI32::new(FIRST_ENTITY_ID));
        let internal = |simple: &str| format!("{INTERNAL_PREFIX}.{version}.{simple}");
        let implementation = |simple: &str| format!("{IMPLEMENTATION_PREFIX}.{version}.{simple}");

        // -- Messages --------------------------------------------------------

        let packet = ClassDef::builder(internal("Packet")).build();
        host.define(packet.clone());

        let message = |simple: &str, fields: &[(&str, ValueKind)]| {
            let mut builder = ClassDef::builder(internal(simple)).extends(&packet);
            for (name, kind) in fields {
                builder = builder.field(name, *kind, Visibility::Private);
            }
            builder.build()
        };

        host.define(message(
            "PacketPlayOutWorldParticles",
            &[
                ("a", ValueKind::Str),
                ("b", ValueKind::Float),
                ("c", ValueKind::Float),
                ("d", ValueKind::Float),
                ("e", ValueKind::Float),
                ("f", ValueKind::Float),
                ("g", ValueKind::Float),
                ("h", ValueKind::Float),
                ("i", ValueKind::Int),
            ],
        ));
        host.define(message("PacketPlayOutTabComplete", &[("a", ValueKind::StrArray)]));
        host.define(message(
            "PacketPlayOutScoreboardDisplayObjective",
            &[("a", ValueKind::Int), ("b", ValueKind::Str)],
        ));
        host.define(message(
            "PacketPlayOutSpawnEntityLiving",
            &[
                ("a", ValueKind::Int),
                ("b", ValueKind::Int),
                ("c", ValueKind::Int),
                ("d", ValueKind::Int),
                ("e", ValueKind::Int),
                ("i", ValueKind::Byte),
                ("j", ValueKind::Byte),
                ("k", ValueKind::Byte),
            ],
        ));
        host.define(message("PacketPlayOutEntityDestroy", &[("a", ValueKind::IntArray)]));
        host.define(message(
            "PacketPlayOutEntityMetadata",
            &[("a", ValueKind::Int), ("b", ValueKind::List)],
        ));
        host.define(message(
            "PacketPlayOutEntityTeleport",
            &[
                ("a", ValueKind::Int),
                ("b", ValueKind::Int),
                ("c", ValueKind::Int),
                ("d", ValueKind::Int),
                ("e", ValueKind::Byte),
                ("f", ValueKind::Byte),
                ("g", ValueKind::Bool),
            ],
        ));

        host.define(
            ClassDef::builder(internal("WatchableObject"))
                .field("a", ValueKind::Int, Visibility::Private)
                .field("b", ValueKind::Int, Visibility::Private)
                .field("c", ValueKind::Any, Visibility::Private)
                .field("d", ValueKind::Bool, Visibility::Private)
                .constructor(
                    &[ValueKind::Int, ValueKind::Int, ValueKind::Any],
                    Visibility::Public,
                    |this, args| {
                        this.raw_set("a", args[0].clone());
                        this.raw_set("b", args[1].clone());
                        this.raw_set("c", args[2].clone());
                        this.raw_set("d", Value::Bool(true));
                        Ok(())
                    },
                )
                .build(),
        );

        // -- Worlds and entities ---------------------------------------------

        let world = ClassDef::builder(internal("World"))
            .field("worldName", ValueKind::Str, Visibility::Private)
            .build();
        let world_server = ClassDef::builder(internal("WorldServer")).extends(&world).build();
        host.define(world.clone());
        host.define(world_server.clone());

        let entity = ClassDef::builder(internal("Entity"))
            .field("id", ValueKind::Int, Visibility::Private)
            .field("world", ValueKind::Object, Visibility::Private)
            .method("getId", &[], ValueKind::Int, Visibility::Public, |this, _| {
                Ok(this.raw_get("id").unwrap_or(Value::Null))
            })
            .constructor(&[ValueKind::Object], Visibility::Public, entity_init(&entity_ids))
            .build();
        let living = ClassDef::builder(internal("EntityLiving"))
            .extends(&entity)
            .field("health", ValueKind::Float, Visibility::Private)
            .constructor(&[ValueKind::Object], Visibility::Public, entity_init(&entity_ids))
            .build();
        host.define(entity);
        host.define(living.clone());

        for boss in ["EntityEnderDragon", "EntityWither"] {
            host.define(
                ClassDef::builder(internal(boss))
                    .extends(&living)
                    .constructor(&[ValueKind::Object], Visibility::Public, entity_init(&entity_ids))
                    .build(),
            );
        }

        // -- Clients ---------------------------------------------------------

        let entity_player = ClassDef::builder(internal("EntityPlayer"))
            .extends(&living)
            .field("playerConnection", ValueKind::Object, Visibility::Public)
            .build();
        host.define(entity_player.clone());

        let accepted = packet.clone();
        let connection = ClassDef::builder(internal("PlayerConnection"))
            .field("player", ValueKind::Object, Visibility::Private)
            .field("sent", ValueKind::List, Visibility::Private)
            .field("closed", ValueKind::Bool, Visibility::Private)
            .method(
                "sendPacket",
                &[ValueKind::Object],
                ValueKind::Any,
                Visibility::Public,
                move |this, args| {
                    if this.raw_get("closed") == Some(Value::Bool(true)) {
                        return Err(HostFault::Raised("channel closed".into()));
                    }
                    match &args[0] {
                        Value::Object(msg) if msg.is_instance_of(&accepted) => {
                            this.raw_push("sent", Value::Object(msg.clone()));
                            Ok(Value::Null)
                        }
                        other => Err(HostFault::Raised(format!(
                            "sendPacket expects a Packet, got {}",
                            other.type_name()
                        ))),
                    }
                },
            )
            .build();
        host.define(connection.clone());

        let craft_player = ClassDef::builder(implementation("entity.CraftPlayer"))
            .field("entity", ValueKind::Object, Visibility::Private)
            .field("name", ValueKind::Str, Visibility::Private)
            .method("getHandle", &[], ValueKind::Object, Visibility::Public, |this, _| {
                Ok(this.raw_get("entity").unwrap_or(Value::Null))
            })
            .method("getName", &[], ValueKind::Str, Visibility::Public, |this, _| {
                Ok(this.raw_get("name").unwrap_or(Value::Null))
            })
            .build();
        host.define(craft_player.clone());

        let craft_world = ClassDef::builder(implementation("CraftWorld"))
            .field("world", ValueKind::Object, Visibility::Private)
            .method("getHandle", &[], ValueKind::Object, Visibility::Public, |this, _| {
                Ok(this.raw_get("world").unwrap_or(Value::Null))
            })
            .build();
        host.define(craft_world.clone());

        tracing::debug!(version, "installed reference release layout");

        Self {
            version: version.to_string(),
            host: Arc::new(host),
            entity_ids,
            craft_player,
            craft_world,
            entity_player,
            connection,
            world_server,
        }
    }

    pub fn host(&self) -> &Arc<MemoryHost> {
        &self.host
    }

    /// The release tag, e.g. `v1_8_R3`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Fully qualified name of an internal class in this release.
    pub fn internal_name(&self, simple: &str) -> String {
        format!("{INTERNAL_PREFIX}.{}.{simple}", self.version)
    }

    /// Creates a connected client and adds it to the roster.
    pub fn connect(&self, name: &str) -> ObjectRef {
        let entity = ObjectRef::allocate(&self.entity_player);
        entity.raw_set("id", Value::Int(self.entity_ids.fetch_add(1, Ordering::Relaxed)));

        let connection = ObjectRef::allocate(&self.connection);
        connection.raw_set("player", Value::Object(entity.clone()));
        entity.raw_set("playerConnection", Value::Object(connection));

        let client = ObjectRef::allocate(&self.craft_player);
        client.raw_set("entity", Value::Object(entity));
        client.raw_set("name", Value::Str(name.to_string()));

        self.host.add_client(client.clone());
        tracing::debug!(client = %client.describe(), name, "client connected");
        client
    }

    /// Tears down the client's connection and removes it from the roster.
    /// The public object stays alive, as a stale reference would.
    pub fn disconnect(&self, client: &ObjectRef) {
        self.detach(client);
        self.host.remove_client(client);
    }

    /// Clears the client's connection without touching the roster, as
    /// happens when a client drops between a roster read and a send.
    pub fn detach(&self, client: &ObjectRef) {
        if let Some(entity) = handle_of(client) {
            entity.raw_set("playerConnection", Value::Null);
        }
    }

    /// Makes the client's connection raise on every send.
    pub fn break_conduit(&self, client: &ObjectRef) {
        if let Some(connection) = connection_of(client) {
            connection.raw_set("closed", Value::Bool(true));
        }
    }

    /// Messages the client's connection has accepted, in order.
    pub fn outbox(&self, client: &ObjectRef) -> Vec<ObjectRef> {
        connection_of(client)
            .and_then(|c| c.raw_get("sent"))
            .and_then(|sent| match sent {
                Value::List(items) => Some(
                    items
                        .into_iter()
                        .filter_map(|v| match v {
                            Value::Object(o) => Some(o),
                            _ => None,
                        })
                        .collect(),
                ),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Creates a world and returns its public object.
    pub fn create_world(&self, name: &str) -> ObjectRef {
        let handle = ObjectRef::allocate(&self.world_server);
        handle.raw_set("worldName", Value::Str(name.to_string()));
        let world = ObjectRef::allocate(&self.craft_world);
        world.raw_set("world", Value::Object(handle));
        world
    }
}

/// Constructor body shared by every entity class: takes the world, hands
/// out the next entity id.
fn entity_init(
    ids: &Arc<AtomicI32>,
) -> impl Fn(&ObjectRef, &[Value]) -> Result<(), HostFault> + Send + Sync + 'static {
    let ids = Arc::clone(ids);
    move |this, args| {
        this.raw_set("world", args[0].clone());
        this.raw_set("id", Value::Int(ids.fetch_add(1, Ordering::Relaxed)));
        Ok(())
    }
}

fn handle_of(client: &ObjectRef) -> Option<ObjectRef> {
    client.raw_get("entity")?.as_object().cloned()
}

fn connection_of(client: &ObjectRef) -> Option<ObjectRef> {
    handle_of(client)?
        .raw_get("playerConnection")?
        .as_object()
        .cloned()
}
