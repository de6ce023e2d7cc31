//! Shared application state and dependency wiring.

use std::sync::Arc;

use hearth_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::{
        ChatRepository, ConnectionRegistry, MessagePusher, MessageRepository,
        NotificationRepository, RoomMembership, TokenResolver, UserDirectory,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        presence::{InMemoryConnectionRegistry, InMemoryRoomMembership},
        repository::{
            InMemoryChatRepository, InMemoryMessageRepository, InMemoryNotificationRepository,
            InMemoryUserDirectory,
        },
    },
    usecase::{
        ChatSubscriptionUseCase, ConnectUseCase, DisconnectUseCase, Dispatcher,
        EditMessageUseCase, ForwardMessageUseCase, GetMessagesUseCase, GetPresenceUseCase,
        MarkReadUseCase, NotificationsUseCase, PinMessageUseCase, SearchMessagesUseCase,
        SendMessageUseCase, SetExpirationUseCase, SetUserStatusUseCase, ToggleReactionUseCase,
        TypingUseCase,
    },
};

/// Implementations injected into the use cases
pub struct Dependencies {
    pub chats: Arc<dyn ChatRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub token_resolver: Arc<dyn TokenResolver>,
    pub users: Arc<dyn UserDirectory>,
    pub registry: Arc<dyn ConnectionRegistry>,
    pub rooms: Arc<dyn RoomMembership>,
    pub message_pusher: Arc<dyn MessagePusher>,
    pub clock: Arc<dyn Clock>,
}

impl Dependencies {
    /// In-memory wiring around an already seeded user directory and chat store
    pub fn in_memory(
        users: Arc<InMemoryUserDirectory>,
        chats: Arc<InMemoryChatRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chats,
            messages: Arc::new(InMemoryMessageRepository::new(clock.clone())),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
            token_resolver: users.clone(),
            users,
            registry: Arc::new(InMemoryConnectionRegistry::new()),
            rooms: Arc::new(InMemoryRoomMembership::new()),
            message_pusher: Arc::new(WebSocketMessagePusher::default()),
            clock,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub token_resolver: Arc<dyn TokenResolver>,
    pub dispatcher: Arc<Dispatcher>,
    // realtime
    pub connect_usecase: Arc<ConnectUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub chat_subscription_usecase: Arc<ChatSubscriptionUseCase>,
    pub typing_usecase: Arc<TypingUseCase>,
    // presence
    pub set_user_status_usecase: Arc<SetUserStatusUseCase>,
    pub get_presence_usecase: Arc<GetPresenceUseCase>,
    // messages
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
    pub pin_message_usecase: Arc<PinMessageUseCase>,
    pub toggle_reaction_usecase: Arc<ToggleReactionUseCase>,
    pub mark_read_usecase: Arc<MarkReadUseCase>,
    pub forward_message_usecase: Arc<ForwardMessageUseCase>,
    pub set_expiration_usecase: Arc<SetExpirationUseCase>,
    pub search_messages_usecase: Arc<SearchMessagesUseCase>,
    pub edit_message_usecase: Arc<EditMessageUseCase>,
    // notifications
    pub notifications_usecase: Arc<NotificationsUseCase>,
}

impl AppState {
    pub fn new(deps: Dependencies, config: &ServerConfig) -> Self {
        let Dependencies {
            chats,
            messages,
            notifications,
            token_resolver,
            users,
            registry,
            rooms,
            message_pusher,
            clock,
        } = deps;

        let dispatcher = Arc::new(Dispatcher::new(
            rooms.clone(),
            message_pusher.clone(),
            notifications.clone(),
        ));

        Self {
            token_resolver,
            connect_usecase: Arc::new(ConnectUseCase::new(
                registry.clone(),
                rooms.clone(),
                message_pusher.clone(),
                dispatcher.clone(),
            )),
            disconnect_usecase: Arc::new(DisconnectUseCase::new(
                registry.clone(),
                rooms.clone(),
                message_pusher,
                dispatcher.clone(),
            )),
            chat_subscription_usecase: Arc::new(ChatSubscriptionUseCase::new(
                chats.clone(),
                rooms,
            )),
            typing_usecase: Arc::new(TypingUseCase::new(chats.clone(), dispatcher.clone())),
            set_user_status_usecase: Arc::new(SetUserStatusUseCase::new(dispatcher.clone())),
            get_presence_usecase: Arc::new(GetPresenceUseCase::new(registry)),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                chats.clone(),
                messages.clone(),
                users,
                dispatcher.clone(),
                clock.clone(),
                config.preview_len,
            )),
            get_messages_usecase: Arc::new(GetMessagesUseCase::new(
                chats.clone(),
                messages.clone(),
            )),
            pin_message_usecase: Arc::new(PinMessageUseCase::new(
                chats.clone(),
                messages.clone(),
                dispatcher.clone(),
                clock.clone(),
            )),
            toggle_reaction_usecase: Arc::new(ToggleReactionUseCase::new(
                chats.clone(),
                messages.clone(),
                dispatcher.clone(),
            )),
            mark_read_usecase: Arc::new(MarkReadUseCase::new(
                chats.clone(),
                messages.clone(),
                dispatcher.clone(),
                clock.clone(),
            )),
            forward_message_usecase: Arc::new(ForwardMessageUseCase::new(
                chats.clone(),
                messages.clone(),
                dispatcher.clone(),
                clock.clone(),
            )),
            set_expiration_usecase: Arc::new(SetExpirationUseCase::new(
                messages.clone(),
                clock.clone(),
            )),
            search_messages_usecase: Arc::new(SearchMessagesUseCase::new(
                chats,
                messages.clone(),
            )),
            edit_message_usecase: Arc::new(EditMessageUseCase::new(
                messages,
                dispatcher.clone(),
                clock,
            )),
            notifications_usecase: Arc::new(NotificationsUseCase::new(notifications)),
            dispatcher,
        }
    }
}
