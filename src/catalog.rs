//! The table of remote operations mirrored by the cookbook.
//!
//! Each [`Operation`] carries everything needed to build its form, validate a
//! submission, call the node directly, and call it through a client handle.
//! Adding an endpoint means adding one entry here.

/// API family an operation belongs to. Controls grouping on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    System,
    Users,
    Ledger,
    Tokens,
    Assets,
    Supply,
    Finance,
    Objects,
}

impl Section {
    /// Sections rendered on the landing page, top to bottom.
    ///
    /// Objects is absent: the node's objects API is unfinished, so its forms
    /// are not offered even though the routes answer.
    pub const PAGE_ORDER: [Section; 7] = [
        Section::System,
        Section::Users,
        Section::Ledger,
        Section::Tokens,
        Section::Assets,
        Section::Supply,
        Section::Finance,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::System => "System API",
            Self::Users => "Users API",
            Self::Ledger => "Ledger API",
            Self::Tokens => "Tokens API",
            Self::Assets => "Assets API",
            Self::Supply => "Supply Chain API",
            Self::Finance => "Finance API",
            Self::Objects => "Objects API",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// What a form input shows before the user types anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefill {
    Blank,
    Literal(&'static str),
    /// The session id of the last login shown on this page.
    Session,
    /// The genesis id of the last login shown on this page.
    Genesis,
}

/// One `key=value` pair of an operation's query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Supplied by the user through a form input.
    Input { name: &'static str, prefill: Prefill },
    /// Always sent with a constant value; shown as plain text on the form.
    Fixed { name: &'static str, value: &'static str },
}

impl Param {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input { name, .. } | Self::Fixed { name, .. } => name,
        }
    }
}

/// How the client library transport obtains its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// A fresh handle with no credentials, dropped after the call.
    Anonymous,
    /// A fresh handle built from the submitted username/password/pin.
    Credentials,
    /// Like `Credentials`, and the handle is registered under the session id
    /// the node hands back.
    Login,
    /// The registered handle named by the `session` form field.
    SessionField,
    /// The registered handle named by the route suffix (`/route/<sid>`).
    RouteSession,
}

/// A client library method and the form fields passed to it, in the method's
/// positional order.
#[derive(Debug, Clone, Copy)]
pub struct SdkCall {
    pub method: &'static str,
    pub args: &'static [&'static str],
}

/// A remote operation exposed as one form and one POST route.
#[derive(Debug)]
pub struct Operation {
    /// Route stem, e.g. `users-login-user`.
    pub route: &'static str,
    /// Remote API path, e.g. `users/login/user`. Also names the operation in
    /// error messages.
    pub remote: &'static str,
    pub section: Section,
    /// Query parameters for the direct transport, in order. Inputs double as
    /// the form's fields.
    pub params: &'static [Param],
    /// Inputs that must be non-empty before any remote call.
    pub required: &'static [&'static str],
    pub sdk: SdkCall,
    pub access: Access,
    /// Response carries a `result` array rendered one item per line.
    pub listing: bool,
}

impl Operation {
    /// Names of the form inputs, in display order.
    pub fn inputs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().filter_map(|p| match p {
            Param::Input { name, .. } => Some(*name),
            Param::Fixed { .. } => None,
        })
    }

    /// Whether the form action carries the current session id as a suffix.
    pub fn takes_route_session(&self) -> bool {
        self.access == Access::RouteSession
    }

    /// Whether the operation is keyed by a `genesis` input, which then
    /// pre-fills the next page instead of the handle's genesis.
    pub fn echoes_genesis(&self) -> bool {
        self.inputs().any(|name| name == "genesis")
    }
}

// ---------------------------------------------------------------------------
// Param shorthands
// ---------------------------------------------------------------------------

const fn input(name: &'static str) -> Param {
    Param::Input {
        name,
        prefill: Prefill::Blank,
    }
}

const fn preset(name: &'static str, value: &'static str) -> Param {
    Param::Input {
        name,
        prefill: Prefill::Literal(value),
    }
}

const fn fixed(name: &'static str, value: &'static str) -> Param {
    Param::Fixed { name, value }
}

const PIN: Param = input("pin");
const SESSION: Param = Param::Input {
    name: "session",
    prefill: Prefill::Session,
};
const GENESIS: Param = Param::Input {
    name: "genesis",
    prefill: Prefill::Genesis,
};
const NAME: Param = input("name");
const ADDRESS: Param = input("address");
const PAGE: Param = preset("page", "0");
const LIMIT: Param = preset("limit", "100");

const fn sdk(method: &'static str, args: &'static [&'static str]) -> SdkCall {
    SdkCall { method, args }
}

// ---------------------------------------------------------------------------
// The table
// ---------------------------------------------------------------------------

pub static OPERATIONS: &[Operation] = &[
    // -- system --------------------------------------------------------------
    Operation {
        route: "system-get-info",
        remote: "system/get/info",
        section: Section::System,
        params: &[],
        required: &[],
        sdk: sdk("nexus_system_get_info", &[]),
        access: Access::Anonymous,
        listing: false,
    },
    Operation {
        route: "system-list-peers",
        remote: "system/list/peers",
        section: Section::System,
        params: &[],
        required: &[],
        sdk: sdk("nexus_system_list_peers", &[]),
        access: Access::Anonymous,
        listing: false,
    },
    Operation {
        route: "system-list-lisp-eids",
        remote: "system/list/lisp-eids",
        section: Section::System,
        params: &[],
        required: &[],
        sdk: sdk("nexus_system_list_lisp_eids", &[]),
        access: Access::Anonymous,
        listing: false,
    },
    // -- users ---------------------------------------------------------------
    Operation {
        route: "users-login-user",
        remote: "users/login/user",
        section: Section::Users,
        params: &[input("username"), input("password"), PIN],
        required: &["username", "password", "pin"],
        sdk: sdk("nexus_users_login_user", &[]),
        access: Access::Login,
        listing: false,
    },
    Operation {
        route: "users-logout-user",
        remote: "users/logout/user",
        section: Section::Users,
        params: &[SESSION],
        required: &["session"],
        sdk: sdk("nexus_users_logout_user", &[]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "users-create-user",
        remote: "users/create/user",
        section: Section::Users,
        params: &[input("username"), input("password"), PIN],
        required: &["username", "password", "pin"],
        sdk: sdk("nexus_users_create_user", &[]),
        access: Access::Credentials,
        listing: false,
    },
    Operation {
        route: "users-lock-user",
        remote: "users/lock/user",
        section: Section::Users,
        params: &[SESSION],
        required: &["session"],
        sdk: sdk("nexus_users_lock_user", &[]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "users-unlock-user",
        remote: "users/unlock/user",
        section: Section::Users,
        params: &[SESSION, PIN],
        required: &["pin", "session"],
        sdk: sdk("nexus_users_unlock_user", &[]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "users-list-transactions",
        remote: "users/list/transactions",
        section: Section::Users,
        params: &[GENESIS, PAGE, LIMIT, preset("verbose", "default")],
        required: &["genesis", "page", "limit", "verbose"],
        sdk: sdk(
            "nexus_users_list_transactions_by_genesis",
            &["page", "limit", "verbose"],
        ),
        access: Access::RouteSession,
        listing: true,
    },
    Operation {
        route: "users-list-notifications",
        remote: "users/list/notifications",
        section: Section::Users,
        params: &[GENESIS, PAGE, LIMIT],
        required: &["genesis", "page", "limit"],
        sdk: sdk(
            "nexus_users_list_notifications_by_genesis",
            &["page", "limit"],
        ),
        access: Access::RouteSession,
        listing: true,
    },
    Operation {
        route: "users-list-items",
        remote: "users/list/items",
        section: Section::Users,
        params: &[GENESIS, PAGE, LIMIT],
        required: &["genesis", "page", "limit"],
        sdk: sdk("nexus_users_list_items_by_genesis", &["page", "limit"]),
        access: Access::RouteSession,
        listing: true,
    },
    Operation {
        route: "users-list-assets",
        remote: "users/list/assets",
        section: Section::Users,
        params: &[GENESIS, PAGE, LIMIT],
        required: &["genesis", "page", "limit"],
        sdk: sdk("nexus_users_list_assets_by_genesis", &["page", "limit"]),
        access: Access::RouteSession,
        listing: true,
    },
    Operation {
        route: "users-list-tokens",
        remote: "users/list/tokens",
        section: Section::Users,
        params: &[GENESIS, PAGE, LIMIT],
        required: &["genesis", "page", "limit"],
        sdk: sdk("nexus_users_list_tokens_by_genesis", &["page", "limit"]),
        access: Access::RouteSession,
        listing: true,
    },
    Operation {
        route: "users-list-accounts",
        remote: "users/list/accounts",
        section: Section::Users,
        params: &[GENESIS, PAGE, LIMIT],
        required: &["genesis", "page", "limit"],
        sdk: sdk("nexus_users_list_accounts_by_genesis", &["page", "limit"]),
        access: Access::RouteSession,
        listing: true,
    },
    // -- ledger --------------------------------------------------------------
    Operation {
        route: "ledger-get-transaction",
        remote: "ledger/get/transaction",
        section: Section::Ledger,
        params: &[input("hash"), preset("verbose", "1")],
        required: &["hash", "verbose"],
        sdk: sdk("nexus_ledger_get_transaction", &["hash", "verbose"]),
        access: Access::RouteSession,
        listing: false,
    },
    Operation {
        route: "ledger-get-block-height",
        remote: "ledger/get/block",
        section: Section::Ledger,
        params: &[input("height"), preset("verbose", "1")],
        required: &["height", "verbose"],
        sdk: sdk("nexus_ledger_get_block_by_height", &["height", "verbose"]),
        access: Access::RouteSession,
        listing: false,
    },
    Operation {
        route: "ledger-get-block-hash",
        remote: "ledger/get/block",
        section: Section::Ledger,
        params: &[input("hash"), preset("verbose", "1")],
        required: &["hash", "verbose"],
        sdk: sdk("nexus_ledger_get_block_by_hash", &["hash", "verbose"]),
        access: Access::RouteSession,
        listing: false,
    },
    Operation {
        route: "ledger-get-blockhash",
        remote: "ledger/get/blockhash",
        section: Section::Ledger,
        params: &[input("height")],
        required: &["height"],
        sdk: sdk("nexus_ledger_get_blockhash", &["height"]),
        access: Access::RouteSession,
        listing: false,
    },
    Operation {
        route: "ledger-submit-transaction",
        remote: "ledger/submit/transaction",
        section: Section::Ledger,
        params: &[input("data")],
        required: &["data"],
        sdk: sdk("nexus_ledger_submit_transaction", &["data"]),
        access: Access::RouteSession,
        listing: false,
    },
    Operation {
        route: "ledger-list-blocks-height",
        remote: "ledger/list/blocks",
        section: Section::Ledger,
        params: &[input("height"), LIMIT, preset("verbose", "1")],
        required: &["height", "limit", "verbose"],
        sdk: sdk(
            "nexus_ledger_list_blocks_by_height",
            &["height", "limit", "verbose"],
        ),
        access: Access::RouteSession,
        listing: true,
    },
    Operation {
        route: "ledger-list-blocks-hash",
        remote: "ledger/list/blocks",
        section: Section::Ledger,
        params: &[input("hash"), LIMIT, preset("verbose", "1")],
        required: &["hash", "limit", "verbose"],
        sdk: sdk(
            "nexus_ledger_list_blocks_by_hash",
            &["hash", "limit", "verbose"],
        ),
        access: Access::RouteSession,
        listing: true,
    },
    // -- tokens --------------------------------------------------------------
    Operation {
        route: "tokens-get-token-name",
        remote: "tokens/get/token",
        section: Section::Tokens,
        params: &[SESSION, NAME],
        required: &["session", "name"],
        sdk: sdk("nexus_tokens_get_token_by_name", &["name"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "tokens-get-token-address",
        remote: "tokens/get/token",
        section: Section::Tokens,
        params: &[SESSION, ADDRESS],
        required: &["session", "address"],
        sdk: sdk("nexus_tokens_get_token_by_address", &["address"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "tokens-create-token",
        remote: "tokens/create/token",
        section: Section::Tokens,
        params: &[PIN, SESSION, NAME, input("supply"), preset("digits", "2")],
        required: &["pin", "session", "name", "supply", "digits"],
        sdk: sdk("nexus_tokens_create_token", &["name", "supply", "digits"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "tokens-debit-token",
        remote: "tokens/debit/token",
        section: Section::Tokens,
        params: &[PIN, SESSION, NAME, input("name_to"), input("amount")],
        required: &["pin", "session", "amount", "name", "name_to"],
        sdk: sdk(
            "nexus_tokens_debit_token_by_name",
            &["name", "name_to", "amount"],
        ),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "tokens-credit-token",
        remote: "tokens/credit/token",
        section: Section::Tokens,
        params: &[PIN, SESSION, NAME, input("amount"), input("txid")],
        required: &["pin", "session", "name", "amount", "txid"],
        sdk: sdk(
            "nexus_tokens_credit_token_by_name",
            &["name", "amount", "txid"],
        ),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "tokens-get-account-name",
        remote: "tokens/get/account",
        section: Section::Tokens,
        params: &[SESSION, NAME],
        required: &["session", "name"],
        sdk: sdk("nexus_tokens_get_account_by_name", &["name"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "tokens-get-account-address",
        remote: "tokens/get/account",
        section: Section::Tokens,
        params: &[SESSION, ADDRESS],
        required: &["session", "address"],
        sdk: sdk("nexus_tokens_get_account_by_address", &["address"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "tokens-create-account",
        remote: "tokens/create/account",
        section: Section::Tokens,
        params: &[PIN, SESSION, NAME, input("token_name")],
        required: &["pin", "session", "name", "token_name"],
        sdk: sdk("nexus_tokens_create_account", &["name", "token_name"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "tokens-debit-account",
        remote: "tokens/debit/account",
        section: Section::Tokens,
        params: &[PIN, SESSION, input("amount"), NAME, input("name_to")],
        required: &["pin", "session", "amount", "name", "name_to"],
        sdk: sdk(
            "nexus_tokens_debit_account_by_name",
            &["name", "name_to", "amount"],
        ),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "tokens-credit-account",
        remote: "tokens/credit/account",
        section: Section::Tokens,
        params: &[
            PIN,
            SESSION,
            input("txid"),
            input("amount"),
            NAME,
            input("name_proof"),
        ],
        required: &["pin", "session", "txid", "amount", "name", "name_proof"],
        sdk: sdk(
            "nexus_tokens_credit_account_by_name",
            &["name", "amount", "txid"],
        ),
        access: Access::SessionField,
        listing: false,
    },
    // -- assets --------------------------------------------------------------
    Operation {
        route: "assets-get-asset-name",
        remote: "assets/get/asset",
        section: Section::Assets,
        params: &[SESSION, NAME],
        required: &["session", "name"],
        sdk: sdk("nexus_assets_get_asset_by_name", &["name"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "assets-get-asset-address",
        remote: "assets/get/asset",
        section: Section::Assets,
        params: &[SESSION, ADDRESS],
        required: &["session", "address"],
        sdk: sdk("nexus_assets_get_asset_by_address", &["address"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "assets-create-asset",
        remote: "assets/create/asset",
        section: Section::Assets,
        params: &[PIN, SESSION, NAME, fixed("format", "raw"), input("data")],
        required: &["pin", "session", "name", "data"],
        sdk: sdk("nexus_assets_create_asset", &["name", "data"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "assets-update-asset",
        remote: "assets/update/asset",
        section: Section::Assets,
        params: &[PIN, SESSION, ADDRESS, input("data")],
        required: &["pin", "session", "address", "data"],
        sdk: sdk("nexus_assets_update_asset_by_address", &["address", "data"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "assets-transfer-asset",
        remote: "assets/transfer/asset",
        section: Section::Assets,
        params: &[PIN, SESSION, ADDRESS, input("destination")],
        required: &["pin", "session", "address", "destination"],
        sdk: sdk(
            "nexus_assets_transfer_asset_by_address",
            &["address", "destination"],
        ),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "assets-claim-asset",
        remote: "assets/claim/asset",
        section: Section::Assets,
        params: &[PIN, SESSION, input("txid")],
        required: &["session", "txid"],
        sdk: sdk("nexus_assets_claim_asset", &["txid"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "assets-tokenize-asset",
        remote: "assets/tokenize/asset",
        section: Section::Assets,
        params: &[PIN, SESSION, input("token_name"), input("asset_name")],
        required: &["pin", "session", "token_name", "asset_name"],
        sdk: sdk(
            "nexus_assets_tokenize_asset_by_name",
            &["asset_name", "token_name"],
        ),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "assets-list-asset-history-name",
        remote: "assets/list/asset/history",
        section: Section::Assets,
        params: &[SESSION, NAME],
        required: &["session", "name"],
        sdk: sdk("nexus_assets_list_asset_history_by_name", &["name"]),
        access: Access::SessionField,
        listing: true,
    },
    Operation {
        route: "assets-list-asset-history-address",
        remote: "assets/list/asset/history",
        section: Section::Assets,
        params: &[SESSION, ADDRESS],
        required: &["session", "address"],
        sdk: sdk("nexus_assets_list_asset_history_by_address", &["address"]),
        access: Access::SessionField,
        listing: true,
    },
    // -- supply --------------------------------------------------------------
    Operation {
        route: "supply-get-item-name",
        remote: "supply/get/item",
        section: Section::Supply,
        params: &[SESSION, NAME],
        required: &["session", "name"],
        sdk: sdk("nexus_supply_get_item_by_name", &["name"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "supply-get-item-address",
        remote: "supply/get/item",
        section: Section::Supply,
        params: &[SESSION, ADDRESS],
        required: &["session", "address"],
        sdk: sdk("nexus_supply_get_item_by_address", &["address"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "supply-create-item",
        remote: "supply/create/item",
        section: Section::Supply,
        params: &[PIN, SESSION, NAME, input("data")],
        required: &["pin", "session", "data"],
        sdk: sdk("nexus_supply_create_item", &["name", "data"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "supply-update-item",
        remote: "supply/update/item",
        section: Section::Supply,
        params: &[PIN, SESSION, ADDRESS, input("data")],
        required: &["pin", "session", "address", "data"],
        sdk: sdk("nexus_supply_update_item_by_address", &["address", "data"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "supply-transfer-item",
        remote: "supply/transfer/item",
        section: Section::Supply,
        params: &[PIN, SESSION, ADDRESS, input("destination")],
        required: &["pin", "session", "address", "destination"],
        sdk: sdk(
            "nexus_supply_transfer_item_by_address",
            &["address", "destination"],
        ),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "supply-claim-item",
        remote: "supply/claim/item",
        section: Section::Supply,
        params: &[PIN, SESSION, input("txid")],
        required: &["pin", "session", "txid"],
        sdk: sdk("nexus_supply_claim_item", &["txid"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "supply-list-item-history-name",
        remote: "supply/list/item/history",
        section: Section::Supply,
        params: &[SESSION, NAME],
        required: &["session", "name"],
        sdk: sdk("nexus_supply_list_item_history_by_name", &["name"]),
        access: Access::SessionField,
        listing: true,
    },
    Operation {
        route: "supply-list-item-history-address",
        remote: "supply/list/item/history",
        section: Section::Supply,
        params: &[SESSION, ADDRESS],
        required: &["session", "address"],
        sdk: sdk("nexus_supply_list_item_history_by_address", &["address"]),
        access: Access::SessionField,
        listing: true,
    },
    // -- finance -------------------------------------------------------------
    Operation {
        route: "finance-get-account-name",
        remote: "finance/get/account",
        section: Section::Finance,
        params: &[SESSION, NAME],
        required: &["session", "name"],
        sdk: sdk("nexus_finance_get_account_by_name", &["name"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "finance-get-account-address",
        remote: "finance/get/account",
        section: Section::Finance,
        params: &[SESSION, ADDRESS],
        required: &["session", "address"],
        sdk: sdk("nexus_finance_get_account_by_address", &["address"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "finance-create-account",
        remote: "finance/create/account",
        section: Section::Finance,
        params: &[PIN, SESSION, NAME],
        required: &["pin", "session", "name"],
        sdk: sdk("nexus_finance_create_account", &["name"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "finance-debit-account",
        remote: "finance/debit/account",
        section: Section::Finance,
        params: &[
            PIN,
            SESSION,
            input("amount"),
            input("name_from"),
            input("name_to"),
        ],
        required: &["pin", "session", "amount", "name_from", "name_to"],
        sdk: sdk(
            "nexus_finance_debit_account_by_name",
            &["name_from", "name_to", "amount"],
        ),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "finance-credit-account",
        remote: "finance/credit/account",
        section: Section::Finance,
        params: &[
            PIN,
            SESSION,
            input("txid"),
            input("amount"),
            input("name_to"),
            input("name_proof"),
        ],
        required: &["pin", "session", "txid", "amount", "name_to", "name_proof"],
        sdk: sdk(
            "nexus_finance_credit_account_by_name",
            &["name_to", "amount", "txid"],
        ),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "finance-get-stakeinfo",
        remote: "finance/get/stakeinfo",
        section: Section::Finance,
        params: &[SESSION],
        required: &["session"],
        sdk: sdk("nexus_finance_get_stakeinfo", &[]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "finance-set-stake",
        remote: "finance/set/stake",
        section: Section::Finance,
        params: &[PIN, SESSION, input("amount")],
        required: &["pin", "session", "amount"],
        sdk: sdk("nexus_finance_set_stake", &["amount"]),
        access: Access::SessionField,
        listing: false,
    },
    Operation {
        route: "finance-list-accounts",
        remote: "finance/list/accounts",
        section: Section::Finance,
        params: &[SESSION],
        required: &["session"],
        sdk: sdk("nexus_finance_list_accounts", &[]),
        access: Access::SessionField,
        listing: false,
    },
    // -- objects -------------------------------------------------------------
    Operation {
        route: "objects-get-schema-name",
        remote: "objects/get/schema",
        section: Section::Objects,
        params: &[NAME, fixed("format", "json")],
        required: &["name"],
        sdk: sdk("nexus_objects_get_schema_by_name", &["name"]),
        access: Access::RouteSession,
        listing: false,
    },
    Operation {
        route: "objects-get-schema-address",
        remote: "objects/get/schema",
        section: Section::Objects,
        params: &[ADDRESS, fixed("format", "json")],
        required: &["address"],
        sdk: sdk("nexus_objects_get_schema_by_address", &["address"]),
        access: Access::RouteSession,
        listing: false,
    },
    Operation {
        route: "objects-create-schema",
        remote: "objects/create/schema",
        section: Section::Objects,
        params: &[
            PIN,
            SESSION,
            NAME,
            fixed("format", "json"),
            input("json"),
        ],
        required: &["pin", "session", "name", "json"],
        sdk: sdk("nexus_objects_create_schema", &["name", "json"]),
        access: Access::SessionField,
        listing: false,
    },
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Every operation, in table order.
pub fn all() -> &'static [Operation] {
    OPERATIONS
}

/// Find the operation served at `/<route>`.
pub fn find(route: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.route == route)
}

/// Operations of one section, in table order.
pub fn by_section(section: Section) -> impl Iterator<Item = &'static Operation> {
    OPERATIONS.iter().filter(move |op| op.section == section)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn routes_are_unique() {
        let mut seen = HashSet::new();
        for op in all() {
            assert!(seen.insert(op.route), "duplicate route {}", op.route);
        }
        assert_eq!(seen.len(), 59);
    }

    #[test]
    fn required_fields_are_declared_inputs() {
        for op in all() {
            let inputs: Vec<_> = op.inputs().collect();
            for req in op.required {
                assert!(inputs.contains(req), "{}: {req} not an input", op.route);
            }
        }
    }

    #[test]
    fn sdk_arguments_are_declared_inputs() {
        for op in all() {
            let inputs: Vec<_> = op.inputs().collect();
            for arg in op.sdk.args {
                assert!(inputs.contains(arg), "{}: {arg} not an input", op.route);
            }
        }
    }

    #[test]
    fn route_session_operations_have_no_session_input() {
        for op in all().iter().filter(|op| op.takes_route_session()) {
            assert!(!op.inputs().any(|n| n == "session"), "{}", op.route);
        }
    }

    #[test]
    fn session_field_operations_have_session_input() {
        for op in all().iter().filter(|op| op.access == Access::SessionField) {
            assert!(op.inputs().any(|n| n == "session"), "{}", op.route);
        }
    }

    #[test]
    fn find_resolves_routes() {
        let op = find("users-login-user").unwrap();
        assert_eq!(op.remote, "users/login/user");
        assert_eq!(op.access, Access::Login);
        assert!(find("users-login").is_none());
    }

    #[test]
    fn list_operations_echo_genesis() {
        let op = find("users-list-assets").unwrap();
        assert!(op.echoes_genesis());
        assert!(op.listing);
        assert!(!find("finance-list-accounts").unwrap().echoes_genesis());
    }

    #[test]
    fn credit_token_sends_its_own_fields() {
        let op = find("tokens-credit-token").unwrap();
        assert_eq!(op.remote, "tokens/credit/token");
        let names: Vec<_> = op.params.iter().map(Param::name).collect();
        assert_eq!(names, ["pin", "session", "name", "amount", "txid"]);
    }

    #[test]
    fn page_sections_cover_everything_but_objects() {
        for op in all() {
            let shown = Section::PAGE_ORDER.contains(&op.section);
            assert_eq!(shown, op.section != Section::Objects, "{}", op.route);
        }
        assert_eq!(by_section(Section::Objects).count(), 3);
    }
}
